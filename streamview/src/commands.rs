use clap::{Parser, Subcommand};
use dashboard::Aggregation;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "streamview", version, about = "Streaming time-series dashboard engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stream synthetic data through a dashboard and report per-chart metrics
    Run {
        #[arg(long)]
        dashboard: Option<PathBuf>,
        #[arg(long, default_value_t = 5)]
        duration_seconds: u64,
        /// Producer batches per second
        #[arg(long, default_value_t = 10.0)]
        rate_hz: f64,
        #[arg(long, default_value_t = 10)]
        batch_size: usize,
        /// Samples of history loaded before streaming starts
        #[arg(long, default_value_t = 1_000)]
        history: usize,
        #[arg(long, alias = "jq")]
        json: bool,
    },
    /// Write a synthetic series as a JSON array
    Generate {
        #[arg(long)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Filter, aggregate and reduce a JSON series file
    Downsample {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, required_unless_present = "decimate")]
        threshold: Option<usize>,
        #[arg(long, value_parser = parse_aggregation, default_value = "none")]
        aggregation: Aggregation,
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long, requires = "end")]
        start: Option<i64>,
        #[arg(long, requires = "start")]
        end: Option<i64>,
        /// Keep every n-th sample instead of running LTTB
        #[arg(long, conflicts_with = "threshold")]
        decimate: Option<usize>,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        stats: bool,
    },
    Dashboard {
        #[command(subcommand)]
        command: DashboardCommands,
    },
}

#[derive(Subcommand)]
pub enum DashboardCommands {
    /// Write a starter dashboard (TOML when the path ends in .toml)
    Init {
        path: PathBuf,
        #[arg(long, default_value = "streamview")]
        name: String,
    },
    /// Validate a dashboard and print its charts
    Show { path: PathBuf },
}

fn parse_aggregation(value: &str) -> Result<Aggregation, String> {
    Aggregation::parse(value).ok_or_else(|| {
        let known: Vec<&str> = Aggregation::ALL.iter().map(|a| a.as_str()).collect();
        format!("unknown aggregation '{value}', expected one of {}", known.join(", "))
    })
}
