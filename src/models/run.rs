//! Run statistics and persisted benchmark run models

use crate::error::{AppError, Result};
use crate::types::RunCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Smallest and largest request counts a run may be stored with
pub const MIN_REQUEST_COUNT: u32 = 1;
pub const MAX_REQUEST_COUNT: u32 = 500;

/// Descriptive statistics derived from the valid samples of one run.
///
/// Values are kept at full precision; rounding is a formatting policy applied
/// only at the recorder boundary (see [`BenchmarkRun::from_statistics`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Number of valid samples the statistics were computed over
    pub count: usize,

    /// Arithmetic mean (milliseconds)
    pub avg_ms: f64,

    /// Smallest valid sample (milliseconds)
    pub min_ms: f64,

    /// Largest valid sample (milliseconds)
    pub max_ms: f64,

    /// Truncated-index median: sorted[floor(count * 0.5)] (milliseconds)
    pub median_ms: f64,

    /// Truncated-index 95th percentile: sorted[floor(count * 0.95)] (milliseconds)
    pub p95_ms: f64,

    /// Sum of all valid samples (milliseconds)
    pub total_ms: f64,
}

/// Round a millisecond value to 3 decimal digits for persistence/display
pub fn round_ms(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// A finalized, persisted benchmark run. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRun {
    /// Deployment mode the run was executed against
    #[serde(rename = "run_type")]
    pub category: RunCategory,

    /// Number of valid samples (may be below the requested count when
    /// individual round trips failed)
    pub request_count: u32,

    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p95_ms: f64,
    pub median_ms: f64,
    pub total_ms: f64,

    /// Optional free-form metadata stored alongside the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    /// When the run completed
    pub created_at: DateTime<Utc>,
}

impl BenchmarkRun {
    /// Build the persisted record from full-precision statistics.
    ///
    /// This is the presentation boundary: every timing field is rounded to
    /// 3 decimal digits here, never earlier.
    pub fn from_statistics(
        category: RunCategory,
        stats: &RunStatistics,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            category,
            request_count: stats.count as u32,
            avg_ms: round_ms(stats.avg_ms),
            min_ms: round_ms(stats.min_ms),
            max_ms: round_ms(stats.max_ms),
            p95_ms: round_ms(stats.p95_ms),
            median_ms: round_ms(stats.median_ms),
            total_ms: round_ms(stats.total_ms),
            metadata,
            created_at: Utc::now(),
        }
    }

    /// Validate the record against the recorder's storage constraints.
    ///
    /// The controller must satisfy these before calling the recorder; a
    /// violation is surfaced as-is, never retried or patched up.
    pub fn validate(&self) -> Result<()> {
        if self.request_count < MIN_REQUEST_COUNT || self.request_count > MAX_REQUEST_COUNT {
            return Err(AppError::validation(format!(
                "request_count must be between {} and {}, got {}",
                MIN_REQUEST_COUNT, MAX_REQUEST_COUNT, self.request_count
            )));
        }

        let fields = [
            ("avg_ms", self.avg_ms),
            ("min_ms", self.min_ms),
            ("max_ms", self.max_ms),
            ("p95_ms", self.p95_ms),
            ("median_ms", self.median_ms),
            ("total_ms", self.total_ms),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::validation(format!(
                    "{} must be a non-negative finite number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
