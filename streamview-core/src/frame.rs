use crate::coords::{ChartDimensions, CoordinateMapper, ScaleBounds};
use crate::downsample::downsample_with_report;
use crate::filter::FilterPipeline;
use crate::sample::Sample;

/// Everything one draw needs, computed from a single snapshot.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub series: Vec<Sample>,
    pub mapper: CoordinateMapper,
    /// Window generation the frame was computed from.
    pub generation: u64,
    pub source_len: usize,
    pub filtered_len: usize,
    pub dropped: usize,
}

/// filter → aggregate → downsample → bounds → mapper over one snapshot.
///
/// Bounds come from the filtered series before downsampling so the axes do
/// not jitter as the selected subset changes.
pub fn prepare_frame(
    snapshot: &[Sample],
    generation: u64,
    pipeline: &FilterPipeline,
    downsample_target: usize,
    dimensions: ChartDimensions,
) -> RenderFrame {
    let filtered = pipeline.apply(snapshot);
    let bounds = ScaleBounds::from_series(&filtered);
    let reduced = downsample_with_report(&filtered, downsample_target);
    RenderFrame {
        series: reduced.points,
        mapper: CoordinateMapper::new(dimensions, bounds),
        generation,
        source_len: snapshot.len(),
        filtered_len: filtered.len(),
        dropped: reduced.dropped,
    }
}
