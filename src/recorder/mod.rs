//! Result recorder: persistence collaborator for finalized runs
//!
//! The harness only depends on the [`Recorder`] trait; the HTTP implementation
//! talks to the benchmark web app, and the in-memory implementation backs unit
//! tests and local comparison display.

use crate::error::{AppError, Result};
use crate::models::config::Config;
use crate::models::run::BenchmarkRun;
use crate::types::RunCategory;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Mutex;

/// Persistence interface for benchmark runs
#[async_trait]
pub trait Recorder: Send + Sync {
    /// Persist a finalized run. The payload must already satisfy the storage
    /// constraints; a rejection is surfaced as a validation error, not retried.
    async fn store(&self, run: &BenchmarkRun) -> Result<()>;

    /// List the most recent runs, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<BenchmarkRun>>;

    /// Fetch the latest run for one category, if any exists
    async fn latest(&self, category: RunCategory) -> Result<Option<BenchmarkRun>>;
}

/// Recorder backed by the benchmark web app's JSON endpoints
pub struct HttpRecorder {
    client: Client,
    runs_url: String,
}

impl HttpRecorder {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("octane-bench/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            runs_url: config.runs_url(),
        })
    }
}

#[async_trait]
impl Recorder for HttpRecorder {
    async fn store(&self, run: &BenchmarkRun) -> Result<()> {
        let response = self.client.post(&self.runs_url).json(run).send().await?;

        match response.status() {
            status if status.is_success() || status.is_redirection() => Ok(()),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::validation(format!(
                    "Recorder rejected the run: {}",
                    body
                )))
            }
            status => Err(AppError::recorder(format!(
                "Storing run failed with status {}",
                status.as_u16()
            ))),
        }
    }

    async fn recent(&self, limit: usize) -> Result<Vec<BenchmarkRun>> {
        let response = self
            .client
            .get(&self.runs_url)
            .query(&[("limit", limit)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::recorder(format!(
                "Listing runs failed with status {}",
                response.status().as_u16()
            )));
        }

        let runs: Vec<BenchmarkRun> = response.json().await?;
        Ok(runs)
    }

    async fn latest(&self, category: RunCategory) -> Result<Option<BenchmarkRun>> {
        // The runs endpoint has no per-category filter; newest-first ordering
        // makes the first match the latest run.
        let runs = self.recent(crate::defaults::LATEST_SCAN_LIMIT).await?;
        Ok(runs.into_iter().find(|r| r.category == category))
    }
}

/// In-memory recorder used by tests and for same-process comparison display
#[derive(Default)]
pub struct MemoryRecorder {
    runs: Mutex<Vec<BenchmarkRun>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of runs stored so far
    pub fn len(&self) -> usize {
        self.runs.lock().expect("recorder lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Recorder for MemoryRecorder {
    async fn store(&self, run: &BenchmarkRun) -> Result<()> {
        // Enforce the same constraints the web app's request validation does
        run.validate()?;
        self.runs
            .lock()
            .expect("recorder lock poisoned")
            .push(run.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<BenchmarkRun>> {
        let runs = self.runs.lock().expect("recorder lock poisoned");
        Ok(runs.iter().rev().take(limit).cloned().collect())
    }

    async fn latest(&self, category: RunCategory) -> Result<Option<BenchmarkRun>> {
        let runs = self.runs.lock().expect("recorder lock poisoned");
        Ok(runs.iter().rev().find(|r| r.category == category).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::run::RunStatistics;

    fn run(category: RunCategory, avg: f64) -> BenchmarkRun {
        BenchmarkRun::from_statistics(
            category,
            &RunStatistics {
                count: 10,
                avg_ms: avg,
                min_ms: avg / 2.0,
                max_ms: avg * 2.0,
                median_ms: avg,
                p95_ms: avg * 1.5,
                total_ms: avg * 10.0,
            },
            None,
        )
    }

    #[tokio::test]
    async fn test_memory_recorder_stores_and_lists() {
        let recorder = MemoryRecorder::new();
        recorder.store(&run(RunCategory::Octane, 2.0)).await.unwrap();
        recorder.store(&run(RunCategory::Standard, 8.0)).await.unwrap();

        assert_eq!(recorder.len(), 2);

        let recent = recorder.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        // Newest first
        assert_eq!(recent[0].category, RunCategory::Standard);
    }

    #[tokio::test]
    async fn test_memory_recorder_recent_respects_limit() {
        let recorder = MemoryRecorder::new();
        for i in 0..5 {
            recorder.store(&run(RunCategory::Octane, 1.0 + i as f64)).await.unwrap();
        }
        let recent = recorder.recent(3).await.unwrap();
        assert_eq!(recent.len(), 3);
    }

    #[tokio::test]
    async fn test_memory_recorder_latest_per_category() {
        let recorder = MemoryRecorder::new();
        recorder.store(&run(RunCategory::Octane, 2.0)).await.unwrap();
        recorder.store(&run(RunCategory::Octane, 3.0)).await.unwrap();

        let latest = recorder.latest(RunCategory::Octane).await.unwrap().unwrap();
        assert!((latest.avg_ms - 3.0).abs() < 1e-9);

        assert!(recorder.latest(RunCategory::Standard).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_recorder_rejects_invalid_run() {
        let recorder = MemoryRecorder::new();
        let mut bad = run(RunCategory::Octane, 2.0);
        bad.request_count = 0;

        let err = recorder.store(&bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_http_recorder_creation() {
        let config = Config::default();
        let recorder = HttpRecorder::new(&config).unwrap();
        assert!(recorder.runs_url.ends_with("/benchmark/runs"));
    }
}
