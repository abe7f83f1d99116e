use crate::error::ConfigurationError;
use crate::sample::Sample;
use crate::validation::Validator;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 40.0,
            left: 60.0,
        }
    }
}

/// Pixel size of a chart and the padding around its plot rectangle.
///
/// Construction guarantees a plot rectangle with positive width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartDimensions {
    width: f64,
    height: f64,
    padding: Padding,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64, padding: Padding) -> Result<Self, ConfigurationError> {
        Validator::non_negative_length("width", width)?;
        Validator::non_negative_length("height", height)?;
        Validator::non_negative_length("padding.top", padding.top)?;
        Validator::non_negative_length("padding.right", padding.right)?;
        Validator::non_negative_length("padding.bottom", padding.bottom)?;
        Validator::non_negative_length("padding.left", padding.left)?;
        let dims = Self {
            width,
            height,
            padding,
        };
        if dims.plot_width() <= 0.0 || dims.plot_height() <= 0.0 {
            return Err(ConfigurationError::EmptyPlotArea { width, height });
        }
        Ok(dims)
    }

    pub fn from_layout(layout: &dashboard::ChartLayout) -> Result<Self, ConfigurationError> {
        Self::new(
            layout.width,
            layout.height,
            Padding {
                top: layout.padding_top,
                right: layout.padding_right,
                bottom: layout.padding_bottom,
                left: layout.padding_left,
            },
        )
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            padding: Padding::default(),
        }
    }
}

/// Data-space extent of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleBounds {
    pub value_min: f64,
    pub value_max: f64,
    pub time_min: f64,
    pub time_max: f64,
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self {
            value_min: 0.0,
            value_max: 100.0,
            time_min: 0.0,
            time_max: 1.0,
        }
    }
}

impl ScaleBounds {
    /// Scans `series` once. Values get 10% headroom on both sides; a flat
    /// series is widened by one unit each way. Non-finite values are ignored.
    pub fn from_series(series: &[Sample]) -> Self {
        let mut value_min = f64::INFINITY;
        let mut value_max = f64::NEG_INFINITY;
        let mut time_min = i64::MAX;
        let mut time_max = i64::MIN;
        for sample in series.iter().filter(|s| s.is_plottable()) {
            value_min = value_min.min(sample.value);
            value_max = value_max.max(sample.value);
            time_min = time_min.min(sample.timestamp);
            time_max = time_max.max(sample.timestamp);
        }
        if value_min > value_max {
            return Self::default();
        }
        let (value_min, value_max) = if value_min == value_max {
            (value_min - 1.0, value_max + 1.0)
        } else {
            let pad = (value_max - value_min) * 0.1;
            (value_min - pad, value_max + pad)
        };
        Self {
            value_min,
            value_max,
            time_min: time_min as f64,
            time_max: time_max as f64,
        }
    }
}

/// Linear map between data space and the padded plot rectangle.
///
/// A zero-width time or value range maps every input to the centre of the
/// corresponding axis, and the inverse maps every pixel back to the range's
/// single value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinateMapper {
    dimensions: ChartDimensions,
    bounds: ScaleBounds,
}

fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        0.5
    } else {
        (value - min) / span
    }
}

fn denormalize(normalized: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        min
    } else {
        min + normalized * span
    }
}

impl CoordinateMapper {
    pub fn new(dimensions: ChartDimensions, bounds: ScaleBounds) -> Self {
        Self { dimensions, bounds }
    }

    pub fn dimensions(&self) -> &ChartDimensions {
        &self.dimensions
    }

    pub fn bounds(&self) -> &ScaleBounds {
        &self.bounds
    }

    pub fn time_to_x(&self, timestamp: f64) -> f64 {
        let t = normalize(timestamp, self.bounds.time_min, self.bounds.time_max);
        self.dimensions.padding.left + t * self.dimensions.plot_width()
    }

    pub fn value_to_y(&self, value: f64) -> f64 {
        let v = normalize(value, self.bounds.value_min, self.bounds.value_max);
        self.dimensions.height - self.dimensions.padding.bottom - v * self.dimensions.plot_height()
    }

    pub fn x_to_time(&self, x: f64) -> f64 {
        let t = (x - self.dimensions.padding.left) / self.dimensions.plot_width();
        denormalize(t, self.bounds.time_min, self.bounds.time_max)
    }

    pub fn y_to_value(&self, y: f64) -> f64 {
        let v = (self.dimensions.height - self.dimensions.padding.bottom - y)
            / self.dimensions.plot_height();
        denormalize(v, self.bounds.value_min, self.bounds.value_max)
    }

    /// Pixel position of a sample.
    pub fn project(&self, sample: &Sample) -> (f64, f64) {
        (
            self.time_to_x(sample.timestamp as f64),
            self.value_to_y(sample.value),
        )
    }
}
