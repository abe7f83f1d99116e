use crate::sample::Sample;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DataStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

/// Min, max and mean of the sample values. All zero for an empty series.
pub fn calculate_statistics(series: &[Sample]) -> DataStatistics {
    if series.is_empty() {
        return DataStatistics::default();
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for sample in series {
        min = min.min(sample.value);
        max = max.max(sample.value);
        sum += sample.value;
    }
    DataStatistics {
        min,
        max,
        mean: sum / series.len() as f64,
        count: series.len(),
    }
}
