use dashboard::{
    Aggregation, ChartDefinition, ChartKind, DashboardDefinition, DashboardSettings, TimeRange,
};

fn sample_dashboard() -> DashboardDefinition {
    let mut scatter = ChartDefinition::new("spread", ChartKind::Scatter);
    scatter.filter.categories = vec!["A".to_string(), "C".to_string()];
    scatter.filter.time_range = Some(TimeRange {
        start: 1_000,
        end: 9_000,
    });
    scatter.downsample_target = Some(1_500);

    let mut bar = ChartDefinition::new("hourly", ChartKind::Bar);
    bar.filter.aggregation = Aggregation::OneHour;

    DashboardDefinition {
        name: "test".to_string(),
        description: "desc".to_string(),
        settings: DashboardSettings {
            window_capacity: 5_000,
            ..DashboardSettings::default()
        },
        charts: vec![scatter, bar],
    }
}

#[test]
fn save_and_load_json_dashboard() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dashboard.json");
    let dashboard = sample_dashboard();

    dashboard.save_to_file(&path).unwrap();
    let loaded = DashboardDefinition::load_from_file(&path).unwrap();

    assert_eq!(loaded, dashboard);
}

#[test]
fn save_and_load_toml_dashboard() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dashboard.toml");
    let dashboard = sample_dashboard();

    dashboard.save_to_file(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("aggregation = \"1hour\""));

    let loaded = DashboardDefinition::load_from_file(&path).unwrap();
    assert_eq!(loaded, dashboard);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("minimal.json");
    std::fs::write(
        &path,
        r#"{"name": "minimal", "charts": [{"name": "trend", "kind": "line"}]}"#,
    )
    .unwrap();

    let loaded = DashboardDefinition::load_from_file(&path).unwrap();
    assert_eq!(loaded.settings, DashboardSettings::default());
    assert_eq!(loaded.settings.window_capacity, 10_000);
    assert_eq!(loaded.charts.len(), 1);
    assert_eq!(loaded.charts[0].filter.aggregation, Aggregation::None);
    assert_eq!(loaded.charts[0].effective_downsample_target(), 600);
}

#[test]
fn load_reports_parse_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        DashboardDefinition::load_from_file(&path),
        Err(dashboard::DashboardError::Json(_))
    ));

    let missing = dir.path().join("missing.toml");
    assert!(matches!(
        DashboardDefinition::load_from_file(&missing),
        Err(dashboard::DashboardError::Io(_))
    ));
}

#[test]
fn aggregation_presets_map_to_bucket_widths() {
    assert_eq!(Aggregation::None.bucket_ms(), None);
    assert_eq!(Aggregation::OneMinute.bucket_ms(), Some(60_000));
    assert_eq!(Aggregation::FiveMinutes.bucket_ms(), Some(300_000));
    assert_eq!(Aggregation::OneHour.bucket_ms(), Some(3_600_000));
    assert_eq!(Aggregation::parse("5min"), Some(Aggregation::FiveMinutes));
    assert_eq!(Aggregation::parse("2min"), None);
}

#[test]
fn chart_kinds_have_distinct_default_budgets() {
    assert_eq!(ChartKind::Line.default_downsample_target(), 600);
    assert_eq!(ChartKind::Scatter.default_downsample_target(), 2_000);
    let mut chart = ChartDefinition::new("x", ChartKind::Scatter);
    chart.downsample_target = Some(42);
    assert_eq!(chart.effective_downsample_target(), 42);
}

#[test]
fn starter_dashboard_has_aggregated_bar_chart() {
    let dashboard = DashboardDefinition::starter("demo");
    assert_eq!(dashboard.charts.len(), 3);
    assert!(dashboard
        .charts
        .iter()
        .any(|c| c.kind == ChartKind::Bar && c.filter.aggregation == Aggregation::OneMinute));
}
