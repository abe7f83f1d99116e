/// Invalid parameters supplied by a caller, rejected before they reach the pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("bucket width must be a positive number of milliseconds, got {0}")]
    InvalidBucketWidth(i64),
    #[error("window capacity must be at least 1")]
    ZeroWindowCapacity,
    #[error("downsample target must be at least 1")]
    ZeroDownsampleTarget,
    #[error("frame rate must be positive with a representable frame interval, got {0}")]
    InvalidFrameRate(f64),
    #[error("time range start {start} is after end {end}")]
    InvertedTimeRange { start: i64, end: i64 },
    #[error("chart dimensions leave no plot area ({width}x{height} with padding)")]
    EmptyPlotArea { width: f64, height: f64 },
    #[error("{0} must be a finite, non-negative number")]
    InvalidLength(&'static str),
    #[error("malformed sample at index {index}: {reason}")]
    MalformedSample { index: usize, reason: String },
    #[error("ingest interval must be greater than zero")]
    ZeroIngestInterval,
    #[error("ingest batch limit must be at least 1")]
    ZeroIngestBatchLimit,
}
