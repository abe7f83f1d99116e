use connection::{ConnectionConfig, ConnectionKind};
use dashboard::DashboardDefinition;
use std::thread;
use std::time::{Duration, Instant};
use streamview_core::{normalize_dashboard, CoordinateMapper, Sample};
use streamview_runtime::{DashboardService, FrameSink};

fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

fn null_sink() -> Box<dyn FrameSink> {
    Box::new(|_: &[Sample], _: &CoordinateMapper| {})
}

#[test]
fn service_ingests_and_renders_every_chart() {
    let mut definition = DashboardDefinition::starter("svc");
    definition.settings.window_capacity = 200;
    definition.settings.ingest_interval_ms = 5;
    definition.settings.ingest_batch_limit = 64;
    let config = normalize_dashboard(&definition).unwrap();
    let connection = ConnectionConfig {
        kind: ConnectionKind::Unbounded,
        queue_capacity: 0,
    };

    let service = DashboardService::start(&config, &connection, |_| null_sink()).unwrap();
    let producer = service.producer();
    for i in 0..500 {
        producer.send(Sample::new(i * 1_000, i as f64, "A")).unwrap();
    }

    assert!(wait_for(|| service.ingested_total() == 500));
    let reader = service.reader();
    assert!(reader.len() <= 200);
    assert_eq!(reader.snapshot().last().map(|s| s.timestamp), Some(499_000));
    assert!(wait_for(|| service
        .charts()
        .iter()
        .all(|chart| chart.latest_frame().map_or(false, |f| f.source_len == reader.len()))));
    assert!(service.chart("per_minute").is_some());

    service.pause_ingest();
    assert!(service.is_ingest_paused());
    service.resume_ingest();

    let report = service.shutdown();
    assert_eq!(report.len(), 3);
    assert!(report.iter().all(|(_, metrics)| metrics.frames_drawn >= 1));
}

#[test]
fn paused_ingest_leaves_samples_queued() {
    let mut definition = DashboardDefinition::new("paused");
    definition.settings.ingest_interval_ms = 5;
    let config = normalize_dashboard(&definition).unwrap();
    let service =
        DashboardService::start(&config, &ConnectionConfig::default(), |_| null_sink()).unwrap();

    service.pause_ingest();
    thread::sleep(Duration::from_millis(20));
    let producer = service.producer();
    producer.send(Sample::new(1, 1.0, "A")).unwrap();
    service.run_for_duration(Duration::from_millis(50));
    assert_eq!(service.reader().len(), 0);

    service.resume_ingest();
    assert!(wait_for(|| service.reader().len() == 1));
    assert!(service.shutdown().is_empty());
}
