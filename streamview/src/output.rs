use dashboard::DashboardDefinition;
use streamview_core::DataStatistics;
use streamview_runtime::PerformanceMetrics;

pub fn print_info(message: &str) {
    println!("[StreamView][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[StreamView][ERROR]: {message}");
}

pub fn print_dashboard(definition: &DashboardDefinition) {
    print_info(&format!("Dashboard '{}'", definition.name));
    if !definition.description.is_empty() {
        println!("{}", definition.description);
    }
    let settings = &definition.settings;
    println!("window_capacity: {}", settings.window_capacity);
    println!("target_fps: {}", settings.target_fps);
    println!("ingest_interval_ms: {}", settings.ingest_interval_ms);
    println!("ingest_batch_limit: {}", settings.ingest_batch_limit);
    if definition.charts.is_empty() {
        println!("Charts:\n\t(none)");
        return;
    }
    println!("Charts:");
    for chart in &definition.charts {
        let categories = if chart.filter.categories.is_empty() {
            "all".to_string()
        } else {
            chart.filter.categories.join(",")
        };
        println!(
            "\t{} ({}) target={} aggregation={} categories={}",
            chart.name,
            chart.kind.as_str(),
            chart.effective_downsample_target(),
            chart.filter.aggregation.as_str(),
            categories
        );
    }
}

pub fn print_metrics(report: &[(String, PerformanceMetrics)]) {
    if report.is_empty() {
        print_info("No charts configured");
        return;
    }
    print_info("Chart metrics:");
    for (name, metrics) in report {
        println!(
            "{name}: fps={:.1} draw={:.3}ms processing={:.3}ms window={} points={} drawn={} skipped={}",
            metrics.fps,
            metrics.avg_draw_time_ms,
            metrics.processing_time_ms,
            metrics.window_len,
            metrics.rendered_points,
            metrics.frames_drawn,
            metrics.ticks_skipped
        );
    }
}

pub fn print_statistics(stats: &DataStatistics) {
    print_info("Statistics:");
    println!("count: {}", stats.count);
    println!("min: {}", stats.min);
    println!("max: {}", stats.max);
    println!("mean: {}", stats.mean);
}
