//! Octane Benchmark
//!
//! A latency benchmark harness that measures serialized HTTP round trips
//! against a web application deployed in "octane" or "standard" mode,
//! aggregates the timings, and records finished runs for comparison.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod recorder;
pub mod runner;
pub mod sampler;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{BenchmarkRun, Config, RunStatistics, TimingSample};
pub use output::{ColoredFormatter, OutputFormatter, OutputFormatterFactory, PlainFormatter};
pub use recorder::{HttpRecorder, MemoryRecorder, Recorder};
pub use runner::{RunController, RunOutcome};
pub use sampler::{HttpSampler, Sampler};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    use crate::types::RunCategory;
    use std::time::Duration;

    pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
    pub const DEFAULT_CATEGORY: RunCategory = RunCategory::Octane;
    pub const DEFAULT_REQUEST_COUNT: u32 = 100;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_HISTORY_LIMIT: usize = 20;
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// A progress snapshot is published every this many completed samples
    pub const PROGRESS_INTERVAL: u32 = 5;

    /// How many recent runs to scan when resolving the latest per category
    pub const LATEST_SCAN_LIMIT: usize = 50;
}
