use crate::error::RuntimeError;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

pub(crate) struct RuntimeThread;

impl RuntimeThread {
    /// Spawns a named worker and waits until it reports that it is running.
    pub(crate) fn spawn<F>(name: &str, f: F) -> Result<thread::JoinHandle<()>, RuntimeError>
    where
        F: FnOnce() + Send + 'static,
    {
        let (status_tx, status_rx) = mpsc::sync_channel(1);
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                if status_tx.send(()).is_err() {
                    return;
                }
                f();
            })
            .map_err(|source| RuntimeError::Spawn {
                name: name.to_string(),
                source,
            })?;

        match status_rx.recv() {
            Ok(()) => Ok(handle),
            Err(_) => {
                let _ = handle.join();
                Err(RuntimeError::Startup(name.to_string()))
            }
        }
    }
}

pub(crate) struct FrameTimer;

impl FrameTimer {
    /// Sleeps until `deadline`. Short waits spin for precision.
    pub(crate) fn sleep_until(deadline: Instant) {
        let now = Instant::now();
        if deadline <= now {
            return;
        }
        let period = deadline - now;
        if period.as_nanos() < 500_000 {
            while Instant::now() < deadline {
                std::hint::spin_loop();
            }
        } else {
            thread::sleep(period);
        }
    }
}
