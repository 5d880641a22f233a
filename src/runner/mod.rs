//! Benchmark run controller
//!
//! Drives one run through its lifecycle: issues exactly `request_count`
//! strictly sequential round trips, publishes live statistics snapshots while
//! running, and hands the finalized result to the recorder. Sampling is
//! deliberately serial: the benchmark measures serialized round-trip latency,
//! not throughput under concurrency.

use crate::error::{AppError, Result};
use crate::models::run::{BenchmarkRun, RunStatistics, MAX_REQUEST_COUNT, MIN_REQUEST_COUNT};
use crate::models::sample::TimingSample;
use crate::recorder::Recorder;
use crate::sampler::Sampler;
use crate::stats;
use crate::types::{RunCategory, RunState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Observer for live progress during a run.
///
/// Fire-and-forget from the controller's perspective: the snapshot is for
/// display only and never affects final results.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, completed: u32, total: u32, snapshot: Option<&RunStatistics>);

    /// Called once per completed round trip, before the next one starts.
    /// Default implementation ignores individual samples.
    fn on_sample(&self, _completed: u32, _sample: &TimingSample) {}
}

/// Observer that discards all progress events
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&self, _completed: u32, _total: u32, _snapshot: Option<&RunStatistics>) {}
}

/// Why a run ended without a recorded result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Every sample failed; there is nothing to record
    NoValidSamples,
    /// Cooperative cancellation was requested between iterations
    Cancelled,
}

/// Final outcome of one run
#[derive(Debug)]
pub enum RunOutcome {
    /// Run finished and the recorder accepted the result
    Completed {
        run: BenchmarkRun,
        statistics: RunStatistics,
    },
    /// Run ended without persistence
    Aborted { reason: AbortReason },
}

/// Orchestrates a single benchmark run.
///
/// Owns the in-progress sample sequence exclusively; nothing else mutates it.
/// A controller is single-use: `Idle → Running → Completed | Aborted`.
pub struct RunController {
    category: RunCategory,
    request_count: u32,
    state: RunState,
    samples: Vec<TimingSample>,
    cancel_flag: Option<Arc<AtomicBool>>,
    run_id: Uuid,
}

impl RunController {
    /// Create a controller for one run. Counts outside `[1, 500]` are rejected
    /// before the run may enter `Running`.
    pub fn new(category: RunCategory, request_count: u32) -> Result<Self> {
        if !(MIN_REQUEST_COUNT..=MAX_REQUEST_COUNT).contains(&request_count) {
            return Err(AppError::validation(format!(
                "request_count must be between {} and {}, got {}",
                MIN_REQUEST_COUNT, MAX_REQUEST_COUNT, request_count
            )));
        }

        Ok(Self {
            category,
            request_count,
            state: RunState::Idle,
            samples: Vec::with_capacity(request_count as usize),
            cancel_flag: None,
            run_id: Uuid::new_v4(),
        })
    }

    /// Attach a cooperative cancellation flag, checked between iterations.
    /// Without one the run always proceeds to completion.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Correlation id for this run, used in logs and stored metadata
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    fn cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .map(|f| f.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    /// Execute the run to completion.
    ///
    /// Issues one sample at a time, waiting for each round trip before the
    /// next. After every 5th completed sample (and after the final one) a
    /// partial statistics snapshot is published to the observer.
    pub async fn run(
        &mut self,
        sampler: &dyn Sampler,
        recorder: &dyn Recorder,
        observer: &dyn ProgressObserver,
    ) -> Result<RunOutcome> {
        if self.state != RunState::Idle {
            return Err(AppError::internal(format!(
                "Run already started (state: {:?})",
                self.state
            )));
        }
        self.state = RunState::Running;

        for i in 0..self.request_count {
            if self.cancelled() {
                self.state = RunState::Aborted;
                return Ok(RunOutcome::Aborted {
                    reason: AbortReason::Cancelled,
                });
            }

            let sample = sampler.sample().await;
            let completed = i + 1;
            observer.on_sample(completed, &sample);
            self.samples.push(sample);

            if completed % crate::defaults::PROGRESS_INTERVAL == 0 || completed == self.request_count {
                let snapshot = stats::partial(&self.samples);
                observer.on_progress(completed, self.request_count, snapshot.as_ref());
            }
        }

        match stats::aggregate(&self.samples) {
            Ok(statistics) => {
                let run = BenchmarkRun::from_statistics(
                    self.category,
                    &statistics,
                    Some(self.metadata()),
                );
                run.validate()?;
                recorder.store(&run).await?;

                self.state = RunState::Completed;
                Ok(RunOutcome::Completed { run, statistics })
            }
            Err(AppError::InsufficientData(_)) => {
                self.state = RunState::Aborted;
                Ok(RunOutcome::Aborted {
                    reason: AbortReason::NoValidSamples,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Free-form metadata persisted with the run
    fn metadata(&self) -> serde_json::Value {
        let failed = self.samples.iter().filter(|s| !s.is_valid()).count();
        serde_json::json!({
            "run_id": self.run_id,
            "requested_count": self.request_count,
            "failed_samples": failed,
            "harness": concat!("octane-bench/", env!("CARGO_PKG_VERSION")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::MemoryRecorder;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Sampler that replays a scripted sequence of samples
    struct ScriptedSampler {
        script: Mutex<VecDeque<TimingSample>>,
    }

    impl ScriptedSampler {
        fn new(samples: Vec<TimingSample>) -> Self {
            Self {
                script: Mutex::new(samples.into()),
            }
        }

        fn successes_then_failures(ok: usize, failed: usize) -> Self {
            let mut samples = Vec::new();
            for i in 0..ok {
                samples.push(TimingSample::success(
                    Duration::from_micros(1_000 + i as u64 * 100),
                    None,
                ));
            }
            for _ in 0..failed {
                samples.push(TimingSample::failed("scripted failure".to_string()));
            }
            Self::new(samples)
        }
    }

    #[async_trait]
    impl Sampler for ScriptedSampler {
        async fn sample(&self) -> TimingSample {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| TimingSample::failed("script exhausted".to_string()))
        }
    }

    /// Observer that records every progress callback it receives
    #[derive(Default)]
    struct RecordingObserver {
        calls: Mutex<Vec<(u32, u32, Option<RunStatistics>)>>,
        samples: Mutex<Vec<TimingSample>>,
    }

    impl ProgressObserver for RecordingObserver {
        fn on_progress(&self, completed: u32, total: u32, snapshot: Option<&RunStatistics>) {
            self.calls
                .lock()
                .unwrap()
                .push((completed, total, snapshot.cloned()));
        }

        fn on_sample(&self, _completed: u32, sample: &TimingSample) {
            self.samples.lock().unwrap().push(sample.clone());
        }
    }

    #[test]
    fn test_request_count_bounds_rejected() {
        assert!(RunController::new(RunCategory::Octane, 0).is_err());
        assert!(RunController::new(RunCategory::Octane, 501).is_err());
        assert!(RunController::new(RunCategory::Octane, 1).is_ok());
        assert!(RunController::new(RunCategory::Octane, 500).is_ok());
    }

    #[tokio::test]
    async fn test_completed_run_records_valid_count() {
        // 100 requested, 3 transport failures: recorder must see 97
        let sampler = ScriptedSampler::successes_then_failures(97, 3);
        let recorder = MemoryRecorder::new();
        let mut controller = RunController::new(RunCategory::Octane, 100).unwrap();

        let outcome = controller
            .run(&sampler, &recorder, &NullObserver)
            .await
            .unwrap();

        assert_eq!(controller.state(), RunState::Completed);
        match outcome {
            RunOutcome::Completed { run, statistics } => {
                assert_eq!(run.request_count, 97);
                assert_eq!(statistics.count, 97);
            }
            RunOutcome::Aborted { .. } => panic!("expected completed run"),
        }
        assert_eq!(recorder.len(), 1);
    }

    #[tokio::test]
    async fn test_single_failed_sample_aborts_without_recording() {
        let sampler = ScriptedSampler::successes_then_failures(0, 1);
        let recorder = MemoryRecorder::new();
        let mut controller = RunController::new(RunCategory::Standard, 1).unwrap();

        let outcome = controller
            .run(&sampler, &recorder, &NullObserver)
            .await
            .unwrap();

        assert_eq!(controller.state(), RunState::Aborted);
        assert!(matches!(
            outcome,
            RunOutcome::Aborted {
                reason: AbortReason::NoValidSamples
            }
        ));
        assert!(recorder.is_empty());
    }

    #[tokio::test]
    async fn test_progress_published_every_fifth_and_final() {
        let sampler = ScriptedSampler::successes_then_failures(7, 0);
        let recorder = MemoryRecorder::new();
        let observer = RecordingObserver::default();
        let mut controller = RunController::new(RunCategory::Octane, 7).unwrap();

        controller.run(&sampler, &recorder, &observer).await.unwrap();

        let calls = observer.calls.lock().unwrap();
        let completed: Vec<u32> = calls.iter().map(|(c, _, _)| *c).collect();
        assert_eq!(completed, vec![5, 7]);
        assert!(calls.iter().all(|(_, total, _)| *total == 7));
        assert!(calls.iter().all(|(_, _, snapshot)| snapshot.is_some()));
    }

    #[tokio::test]
    async fn test_progress_snapshot_absent_while_all_samples_failed() {
        let mut samples = vec![
            TimingSample::failed("boom".to_string());
            5
        ];
        samples.push(TimingSample::success(Duration::from_millis(2), None));
        let sampler = ScriptedSampler::new(samples);
        let recorder = MemoryRecorder::new();
        let observer = RecordingObserver::default();
        let mut controller = RunController::new(RunCategory::Octane, 6).unwrap();

        controller.run(&sampler, &recorder, &observer).await.unwrap();

        let calls = observer.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].2.is_none()); // after 5 failures, nothing to show
        assert_eq!(calls[1].2.as_ref().unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_observer_sees_every_sample() {
        let sampler = ScriptedSampler::successes_then_failures(4, 2);
        let recorder = MemoryRecorder::new();
        let observer = RecordingObserver::default();
        let mut controller = RunController::new(RunCategory::Octane, 6).unwrap();

        controller.run(&sampler, &recorder, &observer).await.unwrap();

        let samples = observer.samples.lock().unwrap();
        assert_eq!(samples.len(), 6);
        assert_eq!(samples.iter().filter(|s| s.is_valid()).count(), 4);
    }

    #[tokio::test]
    async fn test_cancellation_between_iterations() {
        let sampler = ScriptedSampler::successes_then_failures(10, 0);
        let recorder = MemoryRecorder::new();
        let flag = Arc::new(AtomicBool::new(true));
        let mut controller = RunController::new(RunCategory::Octane, 10)
            .unwrap()
            .with_cancel_flag(flag);

        let outcome = controller
            .run(&sampler, &recorder, &NullObserver)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            RunOutcome::Aborted {
                reason: AbortReason::Cancelled
            }
        ));
        assert_eq!(controller.state(), RunState::Aborted);
        assert!(recorder.is_empty());
    }

    #[tokio::test]
    async fn test_run_without_cancel_flag_completes() {
        let sampler = ScriptedSampler::successes_then_failures(5, 0);
        let recorder = MemoryRecorder::new();
        let mut controller = RunController::new(RunCategory::Octane, 5).unwrap();

        let outcome = controller
            .run(&sampler, &recorder, &NullObserver)
            .await
            .unwrap();
        assert!(matches!(outcome, RunOutcome::Completed { .. }));
    }

    #[tokio::test]
    async fn test_controller_is_single_use() {
        let sampler = ScriptedSampler::successes_then_failures(2, 0);
        let recorder = MemoryRecorder::new();
        let mut controller = RunController::new(RunCategory::Octane, 1).unwrap();

        controller.run(&sampler, &recorder, &NullObserver).await.unwrap();
        let err = controller
            .run(&sampler, &recorder, &NullObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_stored_metadata_tracks_failures() {
        let sampler = ScriptedSampler::successes_then_failures(8, 2);
        let recorder = MemoryRecorder::new();
        let mut controller = RunController::new(RunCategory::Octane, 10).unwrap();

        controller.run(&sampler, &recorder, &NullObserver).await.unwrap();

        let stored = recorder.recent(1).await.unwrap();
        let metadata = stored[0].metadata.as_ref().unwrap();
        assert_eq!(metadata["requested_count"], 10);
        assert_eq!(metadata["failed_samples"], 2);
    }
}
