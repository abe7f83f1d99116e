pub mod aggregate;
pub mod buffer;
pub mod coords;
pub mod downsample;
pub mod error;
pub mod filter;
pub mod frame;
pub mod sample;
pub mod settings;
pub mod stats;
pub mod validation;

pub use aggregate::{aggregate_buckets, aggregate_by_time, Bucket, BucketWidth};
pub use buffer::{
    shared, StreamBuffer, StreamReader, StreamWriter, WindowCapacity, WindowSnapshot,
};
pub use coords::{ChartDimensions, CoordinateMapper, Padding, ScaleBounds};
pub use downsample::{decimate, downsample, downsample_with_report, Downsampled};
pub use error::ConfigurationError;
pub use filter::{filter_by_categories, filter_by_time_range, FilterConfig, FilterPipeline};
pub use frame::{prepare_frame, RenderFrame};
pub use sample::{Category, RawSample, Sample};
pub use settings::{normalize_dashboard, ChartConfig, DashboardConfig, FrameRate};
pub use stats::{calculate_statistics, DataStatistics};
