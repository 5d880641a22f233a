//! Single round-trip measurement data model

use crate::types::SampleStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One measured round trip against the ping endpoint.
///
/// Failed samples carry a zero elapsed time; the aggregator filters them out
/// so only derived statistics of valid samples persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSample {
    /// Wall-clock round-trip time in milliseconds (sub-millisecond precision)
    pub elapsed_ms: f64,

    /// Elapsed time the ping endpoint reported for its own handling, if any
    pub server_elapsed_ms: Option<f64>,

    /// Measurement outcome
    pub status: SampleStatus,

    /// When the sample was taken
    pub timestamp: DateTime<Utc>,

    /// Error message if the round trip failed
    pub error_message: Option<String>,
}

impl TimingSample {
    /// Create a successful sample from a measured round-trip duration
    pub fn success(elapsed: Duration, server_elapsed_ms: Option<f64>) -> Self {
        Self {
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            server_elapsed_ms,
            status: SampleStatus::Success,
            timestamp: Utc::now(),
            error_message: None,
        }
    }

    /// Create a failed sample (zero-duration placeholder, excluded from statistics)
    pub fn failed(error_message: String) -> Self {
        Self {
            elapsed_ms: 0.0,
            server_elapsed_ms: None,
            status: SampleStatus::Failed,
            timestamp: Utc::now(),
            error_message: Some(error_message),
        }
    }

    /// Create a timed-out sample
    pub fn timeout(timeout: Duration) -> Self {
        Self {
            elapsed_ms: 0.0,
            server_elapsed_ms: None,
            status: SampleStatus::Timeout,
            timestamp: Utc::now(),
            error_message: Some(format!("Request timed out after {}s", timeout.as_secs())),
        }
    }

    /// Whether this sample contributes to statistics
    pub fn is_valid(&self) -> bool {
        matches!(self.status, SampleStatus::Success) && self.elapsed_ms > 0.0
    }
}
