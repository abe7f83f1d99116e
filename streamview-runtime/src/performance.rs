use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

pub const MEASUREMENT_WINDOW: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PerformanceMetrics {
    pub fps: f64,
    pub avg_draw_time_ms: f64,
    pub processing_time_ms: f64,
    pub window_len: usize,
    pub rendered_points: usize,
    pub frames_drawn: u64,
    pub ticks_skipped: u64,
}

/// Rolling draw statistics over the last [`MEASUREMENT_WINDOW`].
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    window: Duration,
    draws: VecDeque<(Duration, Duration)>,
    processing: Duration,
    window_len: usize,
    rendered_points: usize,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(MEASUREMENT_WINDOW)
    }
}

impl PerformanceMonitor {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            draws: VecDeque::new(),
            processing: Duration::ZERO,
            window_len: 0,
            rendered_points: 0,
        }
    }

    /// Records a draw that finished at `now` and took `draw_time`.
    pub fn record_draw(&mut self, now: Duration, draw_time: Duration) {
        self.draws.push_back((now, draw_time));
        self.expire(now);
    }

    /// Records one filter/downsample pass.
    pub fn record_processing(&mut self, elapsed: Duration, window_len: usize, rendered_points: usize) {
        self.processing = elapsed;
        self.window_len = window_len;
        self.rendered_points = rendered_points;
    }

    fn expire(&mut self, now: Duration) {
        while let Some(&(at, _)) = self.draws.front() {
            if now.saturating_sub(at) > self.window {
                self.draws.pop_front();
            } else {
                break;
            }
        }
    }

    /// Draws per second between the oldest and newest draw still in the window.
    pub fn fps(&self) -> f64 {
        match (self.draws.front(), self.draws.back()) {
            (Some(&(first, _)), Some(&(last, _))) if last > first => {
                (self.draws.len() - 1) as f64 / (last - first).as_secs_f64()
            }
            _ => 0.0,
        }
    }

    pub fn avg_draw_time(&self) -> Duration {
        if self.draws.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.draws.iter().map(|&(_, took)| took).sum();
        total / self.draws.len() as u32
    }

    pub fn snapshot(&self, frames_drawn: u64, ticks_skipped: u64) -> PerformanceMetrics {
        PerformanceMetrics {
            fps: self.fps(),
            avg_draw_time_ms: self.avg_draw_time().as_secs_f64() * 1000.0,
            processing_time_ms: self.processing.as_secs_f64() * 1000.0,
            window_len: self.window_len,
            rendered_points: self.rendered_points,
            frames_drawn,
            ticks_skipped,
        }
    }
}
