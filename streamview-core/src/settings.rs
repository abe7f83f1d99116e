use crate::buffer::WindowCapacity;
use crate::coords::ChartDimensions;
use crate::error::ConfigurationError;
use crate::filter::FilterConfig;
use crate::validation::Validator;
use dashboard::{ChartKind, DashboardDefinition};
use std::time::Duration;

pub const DEFAULT_FRAME_RATE: f64 = 60.0;

/// Target draws per second for one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRate(f64);

impl FrameRate {
    /// Rejects rates whose frame interval does not fit in a [`Duration`].
    pub fn new(fps: f64) -> Result<Self, ConfigurationError> {
        if fps.is_finite() && fps > 0.0 && Duration::try_from_secs_f64(1.0 / fps).is_ok() {
            Ok(Self(fps))
        } else {
            Err(ConfigurationError::InvalidFrameRate(fps))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Minimum spacing between two draws, `1 / fps` seconds.
    pub fn frame_interval(self) -> Duration {
        Duration::from_secs_f64(1.0 / self.0)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self(DEFAULT_FRAME_RATE)
    }
}

#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub name: String,
    pub kind: ChartKind,
    pub downsample_target: usize,
    pub filter: FilterConfig,
    pub dimensions: ChartDimensions,
}

impl ChartConfig {
    pub fn new(name: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            name: name.into(),
            kind,
            downsample_target: kind.default_downsample_target(),
            filter: FilterConfig::default(),
            dimensions: ChartDimensions::default(),
        }
    }
}

/// Validated runtime values for a whole dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub name: String,
    pub capacity: WindowCapacity,
    pub frame_rate: FrameRate,
    pub ingest_interval: Duration,
    pub ingest_batch_limit: usize,
    pub charts: Vec<ChartConfig>,
}

pub fn normalize_dashboard(
    definition: &DashboardDefinition,
) -> Result<DashboardConfig, ConfigurationError> {
    let settings = &definition.settings;
    let capacity = WindowCapacity::new(settings.window_capacity)?;
    let frame_rate = FrameRate::new(settings.target_fps)?;
    if settings.ingest_interval_ms == 0 {
        return Err(ConfigurationError::ZeroIngestInterval);
    }
    let ingest_batch_limit = Validator::positive_count(
        settings.ingest_batch_limit,
        ConfigurationError::ZeroIngestBatchLimit,
    )?;

    let charts = definition
        .charts
        .iter()
        .map(|chart| {
            let downsample_target = Validator::positive_count(
                chart.effective_downsample_target(),
                ConfigurationError::ZeroDownsampleTarget,
            )?;
            Ok(ChartConfig {
                name: chart.name.clone(),
                kind: chart.kind,
                downsample_target,
                filter: FilterConfig::from_definition(&chart.filter)?,
                dimensions: ChartDimensions::from_layout(&chart.layout)?,
            })
        })
        .collect::<Result<Vec<_>, ConfigurationError>>()?;

    Ok(DashboardConfig {
        name: definition.name.clone(),
        capacity,
        frame_rate,
        ingest_interval: Duration::from_millis(settings.ingest_interval_ms),
        ingest_batch_limit,
        charts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_interval_is_reciprocal_of_rate() {
        let rate = FrameRate::new(50.0).unwrap();
        assert_eq!(rate.frame_interval(), Duration::from_millis(20));
    }

    #[test]
    fn frame_rate_rejects_non_positive_and_non_finite() {
        for fps in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(FrameRate::new(fps).is_err(), "{fps} accepted");
        }
    }

    #[test]
    fn frame_rate_rejects_intervals_beyond_duration_range() {
        assert!(matches!(
            FrameRate::new(1e-20),
            Err(ConfigurationError::InvalidFrameRate(_))
        ));
        let slow = FrameRate::new(1e-3).unwrap();
        assert_eq!(slow.frame_interval(), Duration::from_secs(1000));
    }
}
