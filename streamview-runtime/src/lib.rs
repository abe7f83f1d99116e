pub mod chart;
pub mod error;
pub mod frame_cell;
pub mod ingest;
pub mod performance;
mod rt_thread;
pub mod scheduler;
pub mod service;
#[cfg(feature = "tokio")]
pub mod tokio_driver;

pub use chart::{spawn_chart, ChartHandle, ChartMessage, ChartRuntime};
pub use error::RuntimeError;
pub use frame_cell::FrameCell;
pub use ingest::{spawn_ingest, IngestHandle};
pub use performance::{PerformanceMetrics, PerformanceMonitor};
pub use scheduler::{FrameSink, RenderScheduler, SchedulerState, StopHandle, TickOutcome};
pub use service::DashboardService;
#[cfg(feature = "tokio")]
pub use tokio_driver::drive_with_tokio;
