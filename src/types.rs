//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Deployment mode a benchmark run is tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunCategory {
    /// Long-lived application server deployment
    Octane,
    /// Conventional per-request deployment
    Standard,
}

impl RunCategory {
    /// All recognized categories
    pub const ALL: [RunCategory; 2] = [RunCategory::Octane, RunCategory::Standard];

    /// Wire/storage label for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            RunCategory::Octane => "octane",
            RunCategory::Standard => "standard",
        }
    }

    /// The category this one is compared against
    pub fn counterpart(&self) -> RunCategory {
        match self {
            RunCategory::Octane => RunCategory::Standard,
            RunCategory::Standard => RunCategory::Octane,
        }
    }
}

impl fmt::Display for RunCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "octane" => Ok(RunCategory::Octane),
            "standard" => Ok(RunCategory::Standard),
            other => Err(AppError::validation(format!(
                "Unknown run category '{}' (expected 'octane' or 'standard')",
                other
            ))),
        }
    }
}

/// Outcome of a single round-trip measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SampleStatus {
    /// Round trip completed with a success status code
    Success,
    /// Transport-level failure (connect error, non-success status)
    Failed,
    /// Round trip exceeded the configured timeout
    Timeout,
}

/// Lifecycle of a benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// No run started yet
    Idle,
    /// Samples are being collected
    Running,
    /// All samples issued, statistics recorded
    Completed,
    /// Run ended without a recordable result
    Aborted,
}
