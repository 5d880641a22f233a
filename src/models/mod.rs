//! Data models for samples, statistics, and configuration

pub mod config;
pub mod run;
pub mod sample;

pub use config::Config;
pub use run::{BenchmarkRun, RunStatistics};
pub use sample::TimingSample;
