use crate::error::RuntimeError;
use crate::rt_thread::{FrameTimer, RuntimeThread};
use connection::Consumer;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use streamview_core::validation::Validator;
use streamview_core::{ConfigurationError, Sample, StreamWriter};

#[derive(Debug, Default)]
struct IngestControl {
    paused: AtomicBool,
    stopped: AtomicBool,
    ingested: AtomicU64,
}

/// Pump moving samples from an ingestion channel into the window.
pub struct IngestHandle {
    control: Arc<IngestControl>,
    join: Option<JoinHandle<()>>,
}

impl IngestHandle {
    /// Leaves incoming samples queued in the channel until resumed.
    pub fn pause(&self) {
        self.control.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.control.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.control.paused.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, JoinHandle::is_finished)
    }

    pub fn ingested_total(&self) -> u64 {
        self.control.ingested.load(Ordering::SeqCst)
    }

    pub fn stop(&mut self) {
        self.control.stopped.store(true, Ordering::SeqCst);
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                log::warn!("ingest thread panicked");
            }
        }
    }
}

impl Drop for IngestHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drains at most `batch_limit` samples from `consumer` every `interval` and
/// appends them to the window in one batch. Exits when stopped or when every
/// producer is gone and the channel is empty.
pub fn spawn_ingest(
    consumer: Box<dyn Consumer<Sample>>,
    writer: StreamWriter,
    interval: Duration,
    batch_limit: usize,
) -> Result<IngestHandle, RuntimeError> {
    if interval.is_zero() {
        return Err(ConfigurationError::ZeroIngestInterval.into());
    }
    let batch_limit = Validator::positive_count(batch_limit, ConfigurationError::ZeroIngestBatchLimit)?;
    let control = Arc::new(IngestControl::default());
    let thread_control = Arc::clone(&control);

    let join = RuntimeThread::spawn("ingest", move || {
        let mut next = Instant::now();
        while !thread_control.stopped.load(Ordering::SeqCst) {
            if !thread_control.paused.load(Ordering::SeqCst) {
                match consumer.drain(batch_limit) {
                    Ok(batch) if batch.is_empty() => {}
                    Ok(batch) => {
                        let count = batch.len() as u64;
                        writer.append_batch(batch);
                        thread_control.ingested.fetch_add(count, Ordering::SeqCst);
                    }
                    Err(err) => {
                        log::warn!("ingest source closed: {err}");
                        break;
                    }
                }
            }
            next += interval;
            let now = Instant::now();
            if next < now {
                next = now;
            }
            FrameTimer::sleep_until(next);
        }
        log::info!(
            "ingest stopped after {} samples",
            thread_control.ingested.load(Ordering::SeqCst)
        );
    })?;

    Ok(IngestHandle {
        control,
        join: Some(join),
    })
}
