use crate::error::RuntimeError;
use crate::frame_cell::FrameCell;
use crate::performance::{PerformanceMetrics, PerformanceMonitor};
use crate::rt_thread::{FrameTimer, RuntimeThread};
use crate::scheduler::{FrameSink, RenderScheduler, StopHandle, TickOutcome};
use std::sync::mpsc::{self, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use streamview_core::validation::Validator;
use streamview_core::{
    prepare_frame, ChartConfig, ChartDimensions, ConfigurationError, FilterConfig,
    FilterPipeline, FrameRate, RenderFrame, StreamReader,
};

#[derive(Debug, Clone)]
pub enum ChartMessage {
    UpdateFilter(FilterConfig),
    SetDownsampleTarget(usize),
    Stop,
}

/// Processing and scheduling state of one chart instance.
///
/// Reprocesses the window only when the buffer generation or the chart's own
/// settings changed since the last published frame.
pub struct ChartRuntime {
    name: String,
    reader: StreamReader,
    pipeline: FilterPipeline,
    downsample_target: usize,
    dimensions: ChartDimensions,
    cell: Arc<FrameCell>,
    scheduler: RenderScheduler,
    monitor: PerformanceMonitor,
    processed_generation: Option<u64>,
}

impl ChartRuntime {
    pub fn new(config: ChartConfig, frame_rate: FrameRate, reader: StreamReader) -> Self {
        Self {
            name: config.name,
            reader,
            pipeline: FilterPipeline::new(config.filter),
            downsample_target: config.downsample_target,
            dimensions: config.dimensions,
            cell: Arc::new(FrameCell::new()),
            scheduler: RenderScheduler::new(frame_rate),
            monitor: PerformanceMonitor::default(),
            processed_generation: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell(&self) -> Arc<FrameCell> {
        Arc::clone(&self.cell)
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut RenderScheduler {
        &mut self.scheduler
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.scheduler.stop_handle()
    }

    pub fn set_filter(&mut self, filter: FilterConfig) {
        self.pipeline.set_config(filter);
        self.processed_generation = None;
    }

    pub fn set_downsample_target(&mut self, target: usize) -> Result<(), ConfigurationError> {
        self.downsample_target =
            Validator::positive_count(target, ConfigurationError::ZeroDownsampleTarget)?;
        self.processed_generation = None;
        Ok(())
    }

    /// Applies a control message. Returns `false` once the chart should stop.
    pub fn apply(&mut self, message: ChartMessage) -> bool {
        match message {
            ChartMessage::UpdateFilter(filter) => self.set_filter(filter),
            ChartMessage::SetDownsampleTarget(target) => {
                if let Err(err) = self.set_downsample_target(target) {
                    log::warn!("chart '{}': {err}", self.name);
                }
            }
            ChartMessage::Stop => return false,
        }
        true
    }

    /// Recomputes and publishes the frame if anything changed. Returns whether it did.
    pub fn refresh(&mut self) -> bool {
        let generation = self.reader.generation();
        if self.processed_generation == Some(generation) {
            return false;
        }
        let started = Instant::now();
        let snapshot = self.reader.snapshot();
        let frame: RenderFrame = prepare_frame(
            &snapshot,
            snapshot.generation(),
            &self.pipeline,
            self.downsample_target,
            self.dimensions,
        );
        self.monitor
            .record_processing(started.elapsed(), frame.source_len, frame.series.len());
        self.processed_generation = Some(snapshot.generation());
        self.cell.publish(frame);
        true
    }

    /// One loop iteration at monotonic time `now`: refresh, then tick the scheduler.
    pub fn step<S>(&mut self, now: Duration, sink: &mut S) -> TickOutcome
    where
        S: FrameSink + ?Sized,
    {
        self.refresh();
        let started = Instant::now();
        let outcome = self.scheduler.on_tick(now, &self.cell, sink);
        if outcome == TickOutcome::Drawn {
            self.monitor.record_draw(now, started.elapsed());
        }
        outcome
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        self.monitor
            .snapshot(self.scheduler.frames_drawn(), self.scheduler.ticks_skipped())
    }
}

/// Owner side of a chart thread. Dropping it stops the thread.
pub struct ChartHandle {
    name: String,
    control: Sender<ChartMessage>,
    cell: Arc<FrameCell>,
    metrics: Arc<Mutex<PerformanceMetrics>>,
    stop: StopHandle,
    join: Option<JoinHandle<()>>,
}

impl ChartHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn update_filter(&self, filter: FilterConfig) {
        let _ = self.control.send(ChartMessage::UpdateFilter(filter));
    }

    pub fn set_downsample_target(&self, target: usize) -> Result<(), ConfigurationError> {
        let target = Validator::positive_count(target, ConfigurationError::ZeroDownsampleTarget)?;
        let _ = self.control.send(ChartMessage::SetDownsampleTarget(target));
        Ok(())
    }

    pub fn latest_frame(&self) -> Option<Arc<RenderFrame>> {
        self.cell.latest()
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        *self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stops the chart. No draw runs after this returns.
    pub fn stop(&mut self) {
        let _ = self.control.send(ChartMessage::Stop);
        self.stop.stop();
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                log::warn!("chart '{}' thread panicked", self.name);
            }
        }
    }
}

impl Drop for ChartHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Runs a chart on its own thread, drawing into `sink` at `frame_rate`.
pub fn spawn_chart(
    config: ChartConfig,
    frame_rate: FrameRate,
    reader: StreamReader,
    mut sink: Box<dyn FrameSink>,
) -> Result<ChartHandle, RuntimeError> {
    let name = config.name.clone();
    let mut runtime = ChartRuntime::new(config, frame_rate, reader);
    let cell = runtime.cell();
    let stop = runtime.stop_handle();
    let metrics = Arc::new(Mutex::new(PerformanceMetrics::default()));
    let thread_metrics = Arc::clone(&metrics);
    let (control, control_rx) = mpsc::channel::<ChartMessage>();
    let interval = frame_rate.frame_interval();

    let join = RuntimeThread::spawn(&format!("chart-{name}"), move || {
        let epoch = Instant::now();
        runtime.scheduler_mut().start();
        log::info!("chart '{}' started", runtime.name());
        'run: loop {
            loop {
                match control_rx.try_recv() {
                    Ok(message) => {
                        if !runtime.apply(message) {
                            break 'run;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => break 'run,
                }
            }

            let now = epoch.elapsed();
            if runtime.step(now, &mut *sink) == TickOutcome::Stopped {
                break;
            }
            *thread_metrics.lock().unwrap_or_else(PoisonError::into_inner) = runtime.metrics();

            let next = runtime
                .scheduler()
                .next_due()
                .filter(|due| *due > now)
                .unwrap_or(now + interval);
            FrameTimer::sleep_until(epoch + next);
        }
        runtime.scheduler_mut().stop();
        *thread_metrics.lock().unwrap_or_else(PoisonError::into_inner) = runtime.metrics();
        log::info!("chart '{}' stopped", runtime.name());
    })?;

    Ok(ChartHandle {
        name,
        control,
        cell,
        metrics,
        stop,
        join: Some(join),
    })
}
