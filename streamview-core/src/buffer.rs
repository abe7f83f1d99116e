use crate::error::ConfigurationError;
use crate::sample::Sample;
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub const DEFAULT_WINDOW_CAPACITY: usize = 10_000;

/// Maximum number of samples the window may hold. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCapacity(usize);

impl WindowCapacity {
    pub fn new(max: usize) -> Result<Self, ConfigurationError> {
        if max == 0 {
            Err(ConfigurationError::ZeroWindowCapacity)
        } else {
            Ok(Self(max))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Samples dropped from the head on overflow: 10% of capacity, at least one.
    pub fn eviction_batch(self) -> usize {
        (self.0 / 10).max(1)
    }

    /// Window length after `incoming` appends starting from `current` samples.
    fn retained_after(self, current: usize, incoming: usize) -> usize {
        let max = self.0;
        let total = current + incoming;
        if total <= max {
            return total;
        }
        let batch = self.eviction_batch();
        // Every overflow lands on max + 1 - batch; later appends refill towards max.
        let after_first_overflow = incoming - (max + 1 - current);
        (max + 1 - batch) + after_first_overflow % batch
    }
}

impl Default for WindowCapacity {
    fn default() -> Self {
        Self(DEFAULT_WINDOW_CAPACITY)
    }
}

/// Immutable view of the window at one point in time.
#[derive(Debug, Clone)]
pub struct WindowSnapshot {
    samples: Arc<Vec<Sample>>,
    generation: u64,
}

impl WindowSnapshot {
    /// Mutation counter of the buffer when the snapshot was taken.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Deref for WindowSnapshot {
    type Target = [Sample];

    fn deref(&self) -> &[Sample] {
        &self.samples
    }
}

/// Bounded, ordered sample window with batched head eviction.
///
/// Snapshots share storage with the buffer; the next mutation copies the
/// window if a snapshot is still alive, so readers never observe a change.
#[derive(Debug, Clone)]
pub struct StreamBuffer {
    window: Arc<Vec<Sample>>,
    capacity: WindowCapacity,
    generation: u64,
    evicted: u64,
}

impl Default for StreamBuffer {
    fn default() -> Self {
        Self::new(WindowCapacity::default())
    }
}

impl StreamBuffer {
    pub fn new(capacity: WindowCapacity) -> Self {
        Self {
            window: Arc::new(Vec::with_capacity(capacity.get().min(DEFAULT_WINDOW_CAPACITY))),
            capacity,
            generation: 0,
            evicted: 0,
        }
    }

    pub fn capacity(&self) -> WindowCapacity {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Total samples dropped by overflow eviction since creation.
    pub fn evicted_total(&self) -> u64 {
        self.evicted
    }

    pub fn append(&mut self, sample: Sample) {
        let keep = self.capacity.retained_after(self.window.len(), 1);
        let window = Arc::make_mut(&mut self.window);
        window.push(sample);
        self.evict_to(keep);
        self.generation += 1;
    }

    /// Same end state as appending each sample in turn, done as one splice.
    pub fn append_batch(&mut self, samples: Vec<Sample>) {
        if samples.is_empty() {
            return;
        }
        let keep = self.capacity.retained_after(self.window.len(), samples.len());
        let window = Arc::make_mut(&mut self.window);
        window.extend(samples);
        self.evict_to(keep);
        self.generation += 1;
    }

    /// Replaces the window, keeping only the most recent `capacity` samples.
    pub fn reset(&mut self, mut samples: Vec<Sample>) {
        let max = self.capacity.get();
        if samples.len() > max {
            let excess = samples.len() - max;
            samples.drain(..excess);
        }
        self.window = Arc::new(samples);
        self.generation += 1;
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot {
            samples: Arc::clone(&self.window),
            generation: self.generation,
        }
    }

    fn evict_to(&mut self, keep: usize) {
        let window = Arc::make_mut(&mut self.window);
        if window.len() <= keep {
            return;
        }
        let excess = window.len() - keep;
        window.drain(..excess);
        self.evicted += excess as u64;
        log::debug!("evicted {excess} samples, window now {}", window.len());
    }
}

/// Splits a buffer into its single writer and any number of readers.
pub fn shared(buffer: StreamBuffer) -> (StreamWriter, StreamReader) {
    let inner = Arc::new(RwLock::new(buffer));
    (
        StreamWriter {
            inner: Arc::clone(&inner),
        },
        StreamReader { inner },
    )
}

/// The only handle allowed to mutate a shared window. Not `Clone`.
#[derive(Debug)]
pub struct StreamWriter {
    inner: Arc<RwLock<StreamBuffer>>,
}

impl StreamWriter {
    fn write(&self) -> RwLockWriteGuard<'_, StreamBuffer> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, sample: Sample) {
        self.write().append(sample);
    }

    pub fn append_batch(&self, samples: Vec<Sample>) {
        self.write().append_batch(samples);
    }

    pub fn reset(&self, samples: Vec<Sample>) {
        self.write().reset(samples);
    }

    pub fn reader(&self) -> StreamReader {
        StreamReader {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StreamReader {
    inner: Arc<RwLock<StreamBuffer>>,
}

impl StreamReader {
    fn read(&self) -> RwLockReadGuard<'_, StreamBuffer> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        self.read().snapshot()
    }

    pub fn generation(&self) -> u64 {
        self.read().generation()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn capacity(&self) -> WindowCapacity {
        self.read().capacity()
    }
}
