//! Statistics aggregation for benchmark runs
//!
//! Computes descriptive statistics over the valid samples of a run using
//! truncated-index order statistics: `median = sorted[floor(count * 0.5)]`
//! and `p95 = sorted[floor(count * 0.95)]`, both clamped to the last element
//! when the index would fall out of bounds for very small sample counts.

use crate::error::{AppError, Result};
use crate::models::run::RunStatistics;
use crate::models::sample::TimingSample;

/// Compute final statistics over a fixed sequence of samples.
///
/// Failed and zero-duration samples are filtered out first; `count` reflects
/// only the samples that pass the filter. Returns `InsufficientData` when no
/// sample survives the filter.
pub fn aggregate(samples: &[TimingSample]) -> Result<RunStatistics> {
    partial(samples).ok_or_else(|| {
        AppError::insufficient_data(format!(
            "No valid samples among {} collected",
            samples.len()
        ))
    })
}

/// Compute a statistics snapshot over any prefix of a run's samples.
///
/// Pure function of its input sequence; calling it twice with the same prefix
/// yields identical results. Returns `None` while no valid sample exists yet.
pub fn partial(samples: &[TimingSample]) -> Option<RunStatistics> {
    let mut valid: Vec<f64> = samples
        .iter()
        .filter(|s| s.is_valid())
        .map(|s| s.elapsed_ms)
        .collect();

    if valid.is_empty() {
        return None;
    }

    valid.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = valid.len();
    let total_ms: f64 = valid.iter().sum();

    Some(RunStatistics {
        count,
        avg_ms: total_ms / count as f64,
        min_ms: valid[0],
        max_ms: valid[count - 1],
        median_ms: valid[truncated_index(count, 0.5)],
        p95_ms: valid[truncated_index(count, 0.95)],
        total_ms,
    })
}

/// Truncated-index selection into a sorted sequence of `count` elements.
///
/// `floor(count * quantile)` can equal `count` itself (e.g. count=1 at the
/// 95th percentile), so the index is clamped to the last element.
fn truncated_index(count: usize, quantile: f64) -> usize {
    let index = (count as f64 * quantile).floor() as usize;
    index.min(count - 1)
}
