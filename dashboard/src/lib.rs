use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_WINDOW_CAPACITY: usize = 10_000;
pub const DEFAULT_TARGET_FPS: f64 = 60.0;
pub const DEFAULT_INGEST_INTERVAL_MS: u64 = 100;
pub const DEFAULT_INGEST_BATCH_LIMIT: usize = 1_024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settings: DashboardSettings,
    #[serde(default)]
    pub charts: Vec<ChartDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub window_capacity: usize,
    pub target_fps: f64,
    pub ingest_interval_ms: u64,
    pub ingest_batch_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            target_fps: DEFAULT_TARGET_FPS,
            ingest_interval_ms: DEFAULT_INGEST_INTERVAL_MS,
            ingest_batch_limit: DEFAULT_INGEST_BATCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Heatmap,
}

impl ChartKind {
    /// Point budget used when a chart does not set `downsample_target`.
    pub fn default_downsample_target(self) -> usize {
        match self {
            ChartKind::Line | ChartKind::Bar => 600,
            ChartKind::Scatter | ChartKind::Heatmap => 2_000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Heatmap => "heatmap",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDefinition {
    pub name: String,
    pub kind: ChartKind,
    #[serde(default)]
    pub downsample_target: Option<usize>,
    #[serde(default)]
    pub filter: FilterDefinition,
    #[serde(default)]
    pub layout: ChartLayout,
}

impl ChartDefinition {
    pub fn new(name: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            name: name.into(),
            kind,
            downsample_target: None,
            filter: FilterDefinition::default(),
            layout: ChartLayout::default(),
        }
    }

    pub fn effective_downsample_target(&self) -> usize {
        self.downsample_target
            .unwrap_or_else(|| self.kind.default_downsample_target())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub padding_top: f64,
    pub padding_right: f64,
    pub padding_bottom: f64,
    pub padding_left: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            padding_top: 20.0,
            padding_right: 20.0,
            padding_bottom: 40.0,
            padding_left: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDefinition {
    /// Empty means every category passes.
    pub categories: Vec<String>,
    pub aggregation: Aggregation,
    pub time_range: Option<TimeRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Aggregation {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "1hour")]
    OneHour,
}

impl Aggregation {
    pub const ALL: [Aggregation; 4] = [
        Aggregation::None,
        Aggregation::OneMinute,
        Aggregation::FiveMinutes,
        Aggregation::OneHour,
    ];

    pub fn bucket_ms(self) -> Option<i64> {
        match self {
            Aggregation::None => None,
            Aggregation::OneMinute => Some(60_000),
            Aggregation::FiveMinutes => Some(300_000),
            Aggregation::OneHour => Some(3_600_000),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Aggregation::None => "none",
            Aggregation::OneMinute => "1min",
            Aggregation::FiveMinutes => "5min",
            Aggregation::OneHour => "1hour",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("toml write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

impl DashboardDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            settings: DashboardSettings::default(),
            charts: Vec::new(),
        }
    }

    /// Line and scatter views over the whole stream, plus an aggregated bar view.
    pub fn starter(name: impl Into<String>) -> Self {
        let mut bar = ChartDefinition::new("per_minute", ChartKind::Bar);
        bar.filter.aggregation = Aggregation::OneMinute;
        Self {
            name: name.into(),
            description: "Live stream overview".to_string(),
            settings: DashboardSettings::default(),
            charts: vec![
                ChartDefinition::new("trend", ChartKind::Line),
                ChartDefinition::new("spread", ChartKind::Scatter),
                bar,
            ],
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DashboardError> {
        let path = path.as_ref();
        if is_toml(path) {
            fs::write(path, toml::to_string_pretty(self)?)?;
        } else {
            fs::write(path, serde_json::to_vec_pretty(self)?)?;
        }
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let definition = if is_toml(path) {
            toml::from_str(&data)?
        } else {
            serde_json::from_str(&data)?
        };
        Ok(definition)
    }
}
