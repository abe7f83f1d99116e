use crate::chart::{spawn_chart, ChartHandle};
use crate::error::RuntimeError;
use crate::ingest::{spawn_ingest, IngestHandle};
use crate::performance::PerformanceMetrics;
use crate::scheduler::FrameSink;
use connection::{ConnectionConfig, ConnectionFactory, Producer};
use std::time::{Duration, Instant};
use streamview_core::{shared, ChartConfig, DashboardConfig, Sample, StreamBuffer, StreamReader};

/// One window, one ingestion pump and a chart thread per configured chart.
pub struct DashboardService {
    name: String,
    producer: Box<dyn Producer<Sample>>,
    reader: StreamReader,
    ingest: IngestHandle,
    charts: Vec<ChartHandle>,
}

impl DashboardService {
    pub fn start<F>(
        config: &DashboardConfig,
        connection: &ConnectionConfig,
        mut make_sink: F,
    ) -> Result<Self, RuntimeError>
    where
        F: FnMut(&ChartConfig) -> Box<dyn FrameSink>,
    {
        let (producer, consumer) = ConnectionFactory::create::<Sample>(connection);
        let (writer, reader) = shared(StreamBuffer::new(config.capacity));
        let ingest = spawn_ingest(
            consumer,
            writer,
            config.ingest_interval,
            config.ingest_batch_limit,
        )?;

        let mut charts = Vec::with_capacity(config.charts.len());
        for chart in &config.charts {
            let sink = make_sink(chart);
            charts.push(spawn_chart(
                chart.clone(),
                config.frame_rate,
                reader.clone(),
                sink,
            )?);
        }
        log::info!(
            "dashboard '{}' running with {} charts",
            config.name,
            charts.len()
        );

        Ok(Self {
            name: config.name.clone(),
            producer,
            reader,
            ingest,
            charts,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A new sending end for the ingestion channel.
    pub fn producer(&self) -> Box<dyn Producer<Sample>> {
        self.producer.clone_producer()
    }

    pub fn reader(&self) -> StreamReader {
        self.reader.clone()
    }

    pub fn charts(&self) -> &[ChartHandle] {
        &self.charts
    }

    pub fn chart(&self, name: &str) -> Option<&ChartHandle> {
        self.charts.iter().find(|chart| chart.name() == name)
    }

    pub fn pause_ingest(&self) {
        self.ingest.pause();
    }

    pub fn resume_ingest(&self) {
        self.ingest.resume();
    }

    pub fn is_ingest_paused(&self) -> bool {
        self.ingest.is_paused()
    }

    pub fn ingested_total(&self) -> u64 {
        self.ingest.ingested_total()
    }

    pub fn run_for_duration(&self, duration: Duration) {
        let start = Instant::now();
        while start.elapsed() < duration {
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    /// Stops ingestion and every chart, returning each chart's final metrics.
    pub fn shutdown(mut self) -> Vec<(String, PerformanceMetrics)> {
        self.ingest.stop();
        let mut report = Vec::with_capacity(self.charts.len());
        for chart in &mut self.charts {
            chart.stop();
            report.push((chart.name().to_string(), chart.metrics()));
        }
        log::info!("dashboard '{}' stopped", self.name);
        report
    }
}
