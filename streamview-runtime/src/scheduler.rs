//! Frame-budgeted draw loop for one chart.
//!
//! The scheduler does not own a clock or a thread. Whoever drives it passes a
//! monotonic timestamp to [`RenderScheduler::on_tick`]; the scheduler decides
//! whether that tick draws. Ticks that arrive before the frame interval has
//! elapsed are skipped, and an accepted tick always draws the newest frame in
//! the [`FrameCell`], so a slow consumer never queues up stale frames.

use crate::frame_cell::FrameCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use streamview_core::{CoordinateMapper, FrameRate, Sample};

/// Receives accepted frames. Must return promptly; it runs inside the tick.
pub trait FrameSink: Send {
    fn draw(&mut self, series: &[Sample], mapper: &CoordinateMapper);
}

impl<F> FrameSink for F
where
    F: FnMut(&[Sample], &CoordinateMapper) + Send,
{
    fn draw(&mut self, series: &[Sample], mapper: &CoordinateMapper) {
        self(series, mapper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not started yet.
    Idle,
    /// Less than one frame interval since the last draw.
    Skipped,
    Drawn,
    /// Due, but nothing has been published yet.
    NoFrame,
    Stopped,
}

#[derive(Debug, Default)]
struct StopSignal {
    stopped: AtomicBool,
    gate: Mutex<()>,
}

/// Cancels a scheduler from any thread.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    signal: Arc<StopSignal>,
}

impl StopHandle {
    /// Stops the scheduler and waits for an in-flight draw to finish.
    /// Once this returns no draw body runs again.
    ///
    /// Must not be called from inside [`FrameSink::draw`]; use
    /// [`StopHandle::request_stop`] there.
    pub fn stop(&self) {
        self.signal.stopped.store(true, Ordering::SeqCst);
        drop(self.signal.gate.lock().unwrap_or_else(PoisonError::into_inner));
    }

    /// Sets the stop flag without waiting. The current draw completes and the
    /// next tick reports [`TickOutcome::Stopped`].
    pub fn request_stop(&self) {
        self.signal.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.signal.stopped.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct RenderScheduler {
    state: SchedulerState,
    interval: Duration,
    last_frame: Option<Duration>,
    stop: StopHandle,
    frames_drawn: u64,
    ticks_skipped: u64,
}

impl RenderScheduler {
    pub fn new(rate: FrameRate) -> Self {
        Self::with_interval(rate.frame_interval())
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            state: SchedulerState::Idle,
            interval: interval.max(Duration::from_nanos(1)),
            last_frame: None,
            stop: StopHandle::default(),
            frames_drawn: 0,
            ticks_skipped: 0,
        }
    }

    pub fn start(&mut self) {
        if self.state == SchedulerState::Idle && !self.stop.is_stopped() {
            self.state = SchedulerState::Running;
            log::debug!("render scheduler running at {:?} per frame", self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.stop.stop();
        self.state = SchedulerState::Stopped;
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> SchedulerState {
        if self.stop.is_stopped() {
            SchedulerState::Stopped
        } else {
            self.state
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.interval
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn ticks_skipped(&self) -> u64 {
        self.ticks_skipped
    }

    pub fn last_frame(&self) -> Option<Duration> {
        self.last_frame
    }

    /// Earliest timestamp at which a tick would draw.
    pub fn next_due(&self) -> Option<Duration> {
        self.last_frame.map(|last| last + self.interval)
    }

    /// Handles one tick at monotonic time `now`.
    ///
    /// On a draw the last-frame time is rebased to `now - elapsed % interval`,
    /// which keeps the cadence aligned to the frame grid however late the
    /// tick arrived.
    pub fn on_tick<S>(&mut self, now: Duration, cell: &FrameCell, sink: &mut S) -> TickOutcome
    where
        S: FrameSink + ?Sized,
    {
        match self.state {
            SchedulerState::Idle => return TickOutcome::Idle,
            SchedulerState::Stopped => return TickOutcome::Stopped,
            SchedulerState::Running => {}
        }

        let signal = Arc::clone(&self.stop.signal);
        let _gate = signal.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if signal.stopped.load(Ordering::SeqCst) {
            self.state = SchedulerState::Stopped;
            return TickOutcome::Stopped;
        }

        let elapsed = self.last_frame.map(|last| now.saturating_sub(last));
        if let Some(elapsed) = elapsed {
            if elapsed < self.interval {
                self.ticks_skipped += 1;
                return TickOutcome::Skipped;
            }
        }

        let Some(frame) = cell.latest() else {
            return TickOutcome::NoFrame;
        };
        sink.draw(&frame.series, &frame.mapper);
        self.frames_drawn += 1;

        self.last_frame = Some(match elapsed {
            Some(elapsed) => {
                let drift = elapsed.as_nanos() % self.interval.as_nanos();
                now - Duration::from_nanos(drift as u64)
            }
            None => now,
        });
        TickOutcome::Drawn
    }
}
