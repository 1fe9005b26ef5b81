// Sun Oct 18 2026 - Alex

use crate::config::{Config, ConfigError};
use crate::engine::cancel::CancellationToken;
use crate::engine::result::{SegmentOutcome, TaskResult};
use crate::engine::scheduler::TaskScheduler;
use crate::engine::segment::{PlanError, SegmentPlanner};
use crate::engine::task::{PrimeCountJob, SegmentJob, TaskError};
use crate::engine::worker::{PoolError, ShutdownReport, WorkerPool};
use crate::orchestration::aggregator::{ResultAggregator, RunSummary};
use crate::orchestration::collector::ResultCollector;
use crate::orchestration::observer::{RunObserver, RunPlan, SilentObserver};
use crate::utils::logging::scoped_timer;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Planning failed: {0}")]
    Plan(#[from] PlanError),
    #[error("Worker pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("Run cancelled after collecting {collected} of {total} segments")]
    Cancelled { collected: usize, total: usize },
}

impl CoordinatorError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CoordinatorError::Cancelled { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CompletedRun {
    pub summary: RunSummary,
    pub shutdown: ShutdownReport,
}

/// Plans segments, runs them on a fixed pool and reduces the results in segment order.
pub struct Coordinator {
    config: Config,
    job: Arc<dyn SegmentJob>,
    observer: Arc<dyn RunObserver>,
}

impl Coordinator {
    pub fn new(config: Config) -> Self {
        let job = PrimeCountJob::with_progress_steps(config.progress_steps);
        Self {
            config,
            job: Arc::new(job),
            observer: Arc::new(SilentObserver),
        }
    }

    pub fn with_job<J: SegmentJob>(mut self, job: J) -> Self {
        self.job = Arc::new(job);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Runs to completion. Per-segment failures are recorded in the summary; only
    /// setup errors and cancellation are returned as errors. The pool is torn down
    /// before returning on every path.
    pub fn run(&self, cancel: &CancellationToken) -> Result<CompletedRun, CoordinatorError> {
        self.config.validate()?;
        let planner = SegmentPlanner::new(self.config.upper_limit, self.config.segment_size)?;

        let plan = RunPlan {
            pool_size: self.config.pool_size,
            upper_limit: self.config.upper_limit,
            segment_size: self.config.segment_size,
            segment_count: planner.segment_count(),
        };
        self.observer.run_started(&plan);

        let mut pool = WorkerPool::builder(self.config.pool_size)
            .with_name_prefix(&self.config.worker_name_prefix)
            .with_cancel_token(cancel)
            .with_shutdown_grace(self.config.shutdown_grace())
            .build()?;

        let start = Instant::now();
        let collected = self.submit_and_collect(&pool, &planner, cancel);
        let elapsed = start.elapsed();

        let summary = match collected {
            Ok(collector) => {
                let aggregator =
                    ResultAggregator::new(self.config.upper_limit, self.config.pool_size);
                let summary = aggregator.summarize(collector, elapsed);
                self.observer.run_finished(&summary);
                summary
            }
            Err(e) => {
                log::debug!("Run aborted ({}), releasing worker pool", e);
                self.release(&mut pool);
                return Err(e);
            }
        };

        let shutdown = self.release(&mut pool);
        Ok(CompletedRun { summary, shutdown })
    }

    fn submit_and_collect(
        &self,
        pool: &WorkerPool,
        planner: &SegmentPlanner,
        cancel: &CancellationToken,
    ) -> Result<ResultCollector, CoordinatorError> {
        let scheduler = TaskScheduler::new(pool, self.job.clone(), self.observer.clone());
        let pending = scheduler.submit_batch(planner.segments())?;

        let total = pending.len();
        let cancelled = |collected: usize| CoordinatorError::Cancelled { collected, total };
        let mut collector = ResultCollector::with_capacity(total);

        for segment in pending {
            let (segment, completion) = segment
                .wait(cancel, self.config.poll_interval())
                .map_err(|_| cancelled(collector.len()))?;

            // a job stopped by the token is the run being cancelled, not a segment failure
            if cancel.is_cancelled() || matches!(completion.result, Err(TaskError::Cancelled)) {
                return Err(cancelled(collector.len()));
            }

            let outcome = SegmentOutcome::from_completion(segment, completion);
            match &outcome.result {
                TaskResult::Success(count) => {
                    log::debug!("Collected {}: {} primes", segment, count)
                }
                TaskResult::Error(e) => {
                    log::debug!("{} failed on {}: {}", segment, outcome.label(), e)
                }
            }

            self.observer.segment_collected(&outcome);
            collector.record(outcome);
        }

        if cancel.is_cancelled() {
            return Err(cancelled(collector.len()));
        }
        Ok(collector)
    }

    fn release(&self, pool: &mut WorkerPool) -> ShutdownReport {
        let _timer = scoped_timer("worker pool shutdown");
        let report = pool.close(self.config.shutdown_grace());
        self.observer.pool_shutdown(&report);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::segment::Segment;
    use crate::engine::worker::WorkerContext;
    use crate::primes::{count_primes, ProgressSink};
    use parking_lot::Mutex;
    use std::thread;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        collected: Mutex<Vec<(usize, Option<u64>)>>,
        finished: Mutex<Vec<usize>>,
        shutdowns: Mutex<Vec<ShutdownReport>>,
    }

    impl RunObserver for Recorder {
        fn segment_finished(
            &self,
            _worker: &str,
            segment: &Segment,
            _count: u64,
            _elapsed: Duration,
        ) {
            self.finished.lock().push(segment.index());
        }

        fn segment_collected(&self, outcome: &SegmentOutcome) {
            self.collected
                .lock()
                .push((outcome.index(), outcome.result.count()));
        }

        fn pool_shutdown(&self, report: &ShutdownReport) {
            self.shutdowns.lock().push(*report);
        }
    }

    /// Counts primes, with per-index delays and forced failures.
    #[derive(Default)]
    struct ScriptedJob {
        delays: Vec<(usize, Duration)>,
        failing: Vec<usize>,
        panicking: Vec<usize>,
        until_cancelled: Vec<usize>,
    }

    impl SegmentJob for ScriptedJob {
        fn execute(
            &self,
            segment: &Segment,
            worker: &WorkerContext,
            _progress: &mut dyn ProgressSink,
        ) -> Result<u64, TaskError> {
            if self.until_cancelled.contains(&segment.index()) {
                while !worker.is_cancelled() {
                    thread::sleep(Duration::from_millis(5));
                }
                return Err(TaskError::Cancelled);
            }
            if let Some((_, delay)) = self.delays.iter().find(|(i, _)| *i == segment.index()) {
                thread::sleep(*delay);
            }
            if self.panicking.contains(&segment.index()) {
                panic!("scripted panic in segment {}", segment.index());
            }
            if self.failing.contains(&segment.index()) {
                return Err(TaskError::ExecutionError(format!(
                    "scripted failure in segment {}",
                    segment.index()
                )));
            }
            Ok(count_primes(segment.range()))
        }
    }

    fn small_config(pool_size: usize) -> Config {
        Config::new()
            .with_pool_size(pool_size)
            .with_upper_limit(1000)
            .with_segment_size(100)
            .with_shutdown_grace(Duration::from_secs(10))
            .with_poll_interval(Duration::from_millis(5))
    }

    #[test]
    fn test_counts_primes_up_to_1000() {
        let recorder = Arc::new(Recorder::default());
        let coordinator = Coordinator::new(small_config(4)).with_observer(recorder.clone());

        let run = coordinator.run(&CancellationToken::new()).unwrap();

        assert_eq!(run.summary.total_primes, 168);
        assert_eq!(run.summary.segment_count, 10);
        assert_eq!(run.summary.pool_size, 4);
        assert!(run.summary.is_complete());
        assert!(run.shutdown.graceful);
        assert_eq!(run.shutdown.joined_workers, 4);
        assert!(run.shutdown.is_clean());
        assert_eq!(recorder.shutdowns.lock().len(), 1);
    }

    #[test]
    fn test_segmentation_matches_single_segment() {
        let single = Coordinator::new(small_config(1).with_segment_size(1000))
            .run(&CancellationToken::new())
            .unwrap();
        let segmented = Coordinator::new(small_config(3))
            .run(&CancellationToken::new())
            .unwrap();

        assert_eq!(single.summary.segment_count, 1);
        assert_eq!(single.summary.total_primes, segmented.summary.total_primes);
    }

    #[test]
    fn test_single_failure_is_isolated() {
        let recorder = Arc::new(Recorder::default());
        let job = ScriptedJob {
            failing: vec![3],
            ..ScriptedJob::default()
        };
        let coordinator = Coordinator::new(small_config(4))
            .with_job(job)
            .with_observer(recorder.clone());

        let run = coordinator.run(&CancellationToken::new()).unwrap();

        let expected: u64 = SegmentPlanner::new(1000, 100)
            .unwrap()
            .segments()
            .filter(|s| s.index() != 3)
            .map(|s| count_primes(s.range()))
            .sum();
        assert_eq!(run.summary.total_primes, expected);
        assert_eq!(run.summary.failed(), 1);
        assert_eq!(run.summary.segment_count, 10);

        let failure = run.summary.failures().next().unwrap();
        assert_eq!(failure.index(), 3);
        assert_eq!(
            failure.result.error_message(),
            Some("Execution error: scripted failure in segment 3")
        );
        assert_eq!(recorder.collected.lock().len(), 10);
        assert!(run.shutdown.graceful);
        assert!(run.shutdown.is_clean());
    }

    #[test]
    fn test_panicking_segment_is_reported_as_failure() {
        let job = ScriptedJob {
            panicking: vec![0],
            ..ScriptedJob::default()
        };
        let run = Coordinator::new(small_config(2))
            .with_job(job)
            .run(&CancellationToken::new())
            .unwrap();

        assert_eq!(run.summary.failed(), 1);
        assert_eq!(run.summary.total_primes, 168 - 25);
        assert_eq!(
            run.summary.outcomes[0].result.error_message(),
            Some("Task panicked: scripted panic in segment 0")
        );
        assert!(run.shutdown.is_clean());
    }

    #[test]
    fn test_collection_order_survives_out_of_order_completion() {
        let recorder = Arc::new(Recorder::default());
        let job = ScriptedJob {
            delays: vec![(1, Duration::from_millis(200))],
            ..ScriptedJob::default()
        };
        let config = small_config(3).with_upper_limit(300);
        let coordinator = Coordinator::new(config)
            .with_job(job)
            .with_observer(recorder.clone());

        let run = coordinator.run(&CancellationToken::new()).unwrap();

        let finished = recorder.finished.lock().clone();
        let pos = |index: usize| finished.iter().position(|&i| i == index).unwrap();
        assert!(pos(2) < pos(1), "segment 2 should finish before segment 1: {:?}", finished);

        let collected = recorder.collected.lock().clone();
        assert_eq!(
            collected,
            vec![(0, Some(25)), (1, Some(21)), (2, Some(16))]
        );
        assert_eq!(run.summary.count_for(0), Some(25));
        assert_eq!(run.summary.count_for(1), Some(21));
        assert_eq!(run.summary.count_for(2), Some(16));
        assert_eq!(run.summary.total_primes, 62);
    }

    #[test]
    fn test_cancelled_run_still_releases_pool() {
        let recorder = Arc::new(Recorder::default());
        let job = ScriptedJob {
            delays: vec![(0, Duration::from_millis(100))],
            ..ScriptedJob::default()
        };
        let coordinator = Coordinator::new(small_config(2))
            .with_job(job)
            .with_observer(recorder.clone());

        let token = CancellationToken::new();
        let canceller = {
            let token = token.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                token.cancel();
            })
        };

        let err = coordinator.run(&token).unwrap_err();
        canceller.join().unwrap();

        assert!(err.is_cancelled());
        assert!(matches!(err, CoordinatorError::Cancelled { collected: 0, total: 10 }));

        let shutdowns = recorder.shutdowns.lock().clone();
        assert_eq!(shutdowns.len(), 1);
        assert_eq!(shutdowns[0].detached_workers, 0);
        assert!(recorder.collected.lock().is_empty());
    }

    #[test]
    fn test_cancel_while_waiting_on_last_segment_is_not_swallowed() {
        let recorder = Arc::new(Recorder::default());
        let job = ScriptedJob {
            until_cancelled: vec![9],
            ..ScriptedJob::default()
        };
        let coordinator = Coordinator::new(small_config(2))
            .with_job(job)
            .with_observer(recorder.clone());

        let token = CancellationToken::new();
        let canceller = {
            let token = token.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(300));
                token.cancel();
            })
        };

        let result = coordinator.run(&token);
        canceller.join().unwrap();

        assert!(
            matches!(result, Err(CoordinatorError::Cancelled { collected: 9, total: 10 })),
            "{:?}",
            result.map(|run| run.summary)
        );

        let collected = recorder.collected.lock().clone();
        assert_eq!(collected.len(), 9);
        assert!(collected.iter().all(|(_, count)| count.is_some()));

        let shutdowns = recorder.shutdowns.lock().clone();
        assert_eq!(shutdowns.len(), 1);
        assert!(shutdowns[0].graceful);
        assert!(shutdowns[0].is_clean());
    }

    #[test]
    fn test_sub_second_grace_shuts_down_cleanly() {
        let config = small_config(2).with_shutdown_grace(Duration::from_millis(900));
        let run = Coordinator::new(config)
            .run(&CancellationToken::new())
            .unwrap();

        assert_eq!(run.summary.total_primes, 168);
        assert!(run.shutdown.graceful, "{}", run.shutdown);
        assert_eq!(run.shutdown.discarded_jobs, 0);
        assert!(run.shutdown.is_clean());
    }

    #[test]
    fn test_invalid_config_is_rejected_before_pool_creation() {
        let recorder = Arc::new(Recorder::default());
        let err = Coordinator::new(small_config(0))
            .with_observer(recorder.clone())
            .run(&CancellationToken::new())
            .unwrap_err();

        assert!(matches!(err, CoordinatorError::Config(_)));
        assert!(recorder.shutdowns.lock().is_empty());
    }
}
