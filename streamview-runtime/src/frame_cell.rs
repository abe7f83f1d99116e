use std::sync::{Arc, PoisonError, RwLock};
use streamview_core::RenderFrame;

/// Latest computed frame of one chart.
///
/// Publishing swaps the whole frame, so a reader sees either the previous or
/// the next frame and never a mix of both.
#[derive(Debug, Default)]
pub struct FrameCell {
    current: RwLock<Option<Arc<RenderFrame>>>,
}

impl FrameCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, frame: RenderFrame) {
        let frame = Arc::new(frame);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(frame);
    }

    pub fn latest(&self) -> Option<Arc<RenderFrame>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
