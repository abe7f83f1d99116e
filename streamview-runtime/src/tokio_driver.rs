use crate::chart::ChartRuntime;
use crate::scheduler::{FrameSink, TickOutcome};
use tokio::time::{interval, Instant, MissedTickBehavior};

/// Drives a chart from a tokio interval until its scheduler is stopped.
///
/// Missed ticks are skipped rather than replayed. Returns the number of
/// frames drawn.
pub async fn drive_with_tokio<S>(runtime: &mut ChartRuntime, sink: &mut S) -> u64
where
    S: FrameSink + ?Sized,
{
    let epoch = Instant::now();
    let mut ticker = interval(runtime.scheduler().frame_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    runtime.scheduler_mut().start();
    loop {
        let tick = ticker.tick().await;
        if runtime.step(tick.saturating_duration_since(epoch), sink) == TickOutcome::Stopped {
            break;
        }
    }
    runtime.scheduler().frames_drawn()
}
