use crate::commands::*;
use crate::generator::SyntheticProducer;
use crate::output::*;
use connection::{ConnectionConfig, ConnectionKind};
use dashboard::{Aggregation, DashboardDefinition};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use streamview_core::{
    calculate_statistics, decimate, downsample_with_report, normalize_dashboard, BucketWidth,
    CoordinateMapper, FilterConfig, FilterPipeline, RawSample, Sample,
};
use streamview_runtime::{DashboardService, FrameSink};

type CommandResult = Result<(), Box<dyn Error>>;

pub fn handle_command(command: Commands) -> CommandResult {
    match command {
        Commands::Run {
            dashboard,
            duration_seconds,
            rate_hz,
            batch_size,
            history,
            json,
        } => handle_run(
            dashboard.as_deref(),
            Duration::from_secs(duration_seconds),
            rate_hz,
            batch_size,
            history,
            json,
        ),
        Commands::Generate {
            count,
            seed,
            output,
        } => handle_generate(count, seed, output.as_deref()),
        Commands::Downsample {
            input,
            threshold,
            aggregation,
            categories,
            start,
            end,
            decimate,
            output,
            stats,
        } => handle_downsample(DownsampleRequest {
            input,
            threshold,
            aggregation,
            categories,
            time_range: start.zip(end),
            decimate,
            output,
            stats,
        }),
        Commands::Dashboard { command } => handle_dashboard_command(command),
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// Logs each accepted frame instead of painting it.
struct LogSink {
    chart: String,
    frames: u64,
}

impl FrameSink for LogSink {
    fn draw(&mut self, series: &[Sample], mapper: &CoordinateMapper) {
        self.frames += 1;
        if let (Some(first), Some(last)) = (series.first(), series.last()) {
            let (x0, y0) = mapper.project(first);
            let (x1, y1) = mapper.project(last);
            log::debug!(
                "{} frame {}: {} points from ({x0:.1}, {y0:.1}) to ({x1:.1}, {y1:.1})",
                self.chart,
                self.frames,
                series.len()
            );
        }
    }
}

fn handle_run(
    dashboard: Option<&Path>,
    duration: Duration,
    rate_hz: f64,
    batch_size: usize,
    history: usize,
    json: bool,
) -> CommandResult {
    let period = Some(rate_hz)
        .filter(|rate| rate.is_finite() && *rate > 0.0)
        .and_then(|rate| Duration::try_from_secs_f64(1.0 / rate).ok())
        .ok_or_else(|| format!("rate must be a positive number, got {rate_hz}"))?;
    let definition = match dashboard {
        Some(path) => DashboardDefinition::load_from_file(path)?,
        None => DashboardDefinition::starter("streamview"),
    };
    let config = normalize_dashboard(&definition)?;
    let connection = ConnectionConfig {
        kind: ConnectionKind::Unbounded,
        ..ConnectionConfig::default()
    };
    let service = DashboardService::start(&config, &connection, |chart| {
        Box::new(LogSink {
            chart: chart.name.clone(),
            frames: 0,
        }) as Box<dyn FrameSink>
    })?;

    let mut generator = SyntheticProducer::new(None);
    let producer = service.producer();
    producer.send_batch(generator.history(history, now_ms()))?;

    let stop = Arc::new(AtomicBool::new(false));
    let producer_stop = Arc::clone(&stop);
    let producer_thread = thread::spawn(move || {
        while !producer_stop.load(Ordering::SeqCst) {
            if let Err(err) = producer.send_batch(generator.batch(batch_size, now_ms())) {
                log::warn!("synthetic producer stopped: {err}");
                break;
            }
            thread::sleep(period);
        }
    });

    print_info(&format!(
        "Streaming into '{}' for {}s",
        service.name(),
        duration.as_secs()
    ));
    service.run_for_duration(duration);
    stop.store(true, Ordering::SeqCst);
    if producer_thread.join().is_err() {
        log::warn!("synthetic producer panicked");
    }
    let ingested = service.ingested_total();
    let report = service.shutdown();

    if json {
        let charts = report
            .iter()
            .map(|(name, metrics)| Ok((name.clone(), serde_json::to_value(metrics)?)))
            .collect::<Result<serde_json::Map<_, _>, serde_json::Error>>()?;
        let summary = serde_json::json!({
            "dashboard": config.name,
            "ingested": ingested,
            "charts": charts,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_info(&format!("Ingested {ingested} samples"));
        print_metrics(&report);
    }
    Ok(())
}

fn write_samples(samples: &[Sample], output: Option<&Path>) -> CommandResult {
    let data = serde_json::to_string_pretty(samples)?;
    match output {
        Some(path) => {
            std::fs::write(path, data)?;
            print_info(&format!(
                "Wrote {} samples to {}",
                samples.len(),
                path.display()
            ));
        }
        None => println!("{data}"),
    }
    Ok(())
}

fn handle_generate(count: usize, seed: Option<u64>, output: Option<&Path>) -> CommandResult {
    let samples = SyntheticProducer::new(seed).history(count, now_ms());
    write_samples(&samples, output)
}

struct DownsampleRequest {
    input: PathBuf,
    threshold: Option<usize>,
    aggregation: Aggregation,
    categories: Vec<String>,
    time_range: Option<(i64, i64)>,
    decimate: Option<usize>,
    output: Option<PathBuf>,
    stats: bool,
}

fn handle_downsample(request: DownsampleRequest) -> CommandResult {
    let text = std::fs::read_to_string(&request.input)
        .map_err(|err| format!("Failed to read '{}': {err}", request.input.display()))?;
    let raw: Vec<RawSample> = serde_json::from_str(&text)?;
    let series = Sample::from_raw_batch(&raw)?;

    let mut filter = FilterConfig::all().with_categories(request.categories.iter().map(String::as_str));
    if let Some((start, end)) = request.time_range {
        filter = filter.with_time_range(start, end)?;
    }
    if let Some(width) = BucketWidth::from_aggregation(request.aggregation)? {
        filter = filter.with_aggregation(width);
    }
    let filtered = FilterPipeline::new(filter).apply(&series);

    let reduced = match (request.decimate, request.threshold) {
        (Some(factor), _) => decimate(&filtered, factor),
        (None, Some(threshold)) => {
            let report = downsample_with_report(&filtered, threshold);
            if report.dropped > 0 {
                log::warn!("dropped {} samples with non-finite values", report.dropped);
            }
            report.points
        }
        (None, None) => filtered.clone(),
    };
    log::info!(
        "{} samples, {} after filtering, {} after reduction",
        series.len(),
        filtered.len(),
        reduced.len()
    );

    write_samples(&reduced, request.output.as_deref())?;
    if request.stats {
        print_statistics(&calculate_statistics(&reduced));
    }
    Ok(())
}

fn handle_dashboard_command(command: DashboardCommands) -> CommandResult {
    match command {
        DashboardCommands::Init { path, name } => {
            if path.exists() {
                return Err(format!("'{}' already exists", path.display()).into());
            }
            DashboardDefinition::starter(name).save_to_file(&path)?;
            print_info(&format!("Dashboard written to {}", path.display()));
        }
        DashboardCommands::Show { path } => {
            let definition = DashboardDefinition::load_from_file(&path)?;
            normalize_dashboard(&definition)?;
            print_dashboard(&definition);
        }
    }
    Ok(())
}
