// Sun Oct 18 2026 - Alex

use crate::engine::segment::Segment;
use crate::engine::worker::WorkerContext;
use crate::orchestration::observer::RunObserver;
use crate::primes::{PrimeCounter, ProgressSink, ProgressUpdate};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task panicked: {0}")]
    Panicked(String),
    #[error("Task was cancelled")]
    Cancelled,
    #[error("Task was abandoned before it produced a result")]
    Abandoned,
    #[error("Execution error: {0}")]
    ExecutionError(String),
}

/// Computation applied to a single segment.
pub trait SegmentJob: Send + Sync + 'static {
    fn execute(
        &self,
        segment: &Segment,
        worker: &WorkerContext,
        progress: &mut dyn ProgressSink,
    ) -> Result<u64, TaskError>;
}

#[derive(Debug, Clone, Default)]
pub struct PrimeCountJob {
    counter: PrimeCounter,
}

impl PrimeCountJob {
    pub fn new(counter: PrimeCounter) -> Self {
        Self { counter }
    }

    pub fn with_progress_steps(steps: u64) -> Self {
        Self::new(PrimeCounter::new().with_progress_steps(steps))
    }
}

impl SegmentJob for PrimeCountJob {
    fn execute(
        &self,
        segment: &Segment,
        worker: &WorkerContext,
        progress: &mut dyn ProgressSink,
    ) -> Result<u64, TaskError> {
        self.counter.count(segment.range(), progress, worker.cancel_token())
    }
}

/// One unit of work handed to the pool: a segment plus the job that processes it.
pub struct SegmentTask {
    segment: Segment,
    job: Arc<dyn SegmentJob>,
    observer: Arc<dyn RunObserver>,
}

impl SegmentTask {
    pub fn new(segment: Segment, job: Arc<dyn SegmentJob>, observer: Arc<dyn RunObserver>) -> Self {
        Self {
            segment,
            job,
            observer,
        }
    }

    pub fn execute(&self, worker: &WorkerContext) -> Result<u64, TaskError> {
        let name = worker.name();
        if worker.is_cancelled() {
            log::debug!("{} skipping {}, run cancelled", name, self.segment);
            return Err(TaskError::Cancelled);
        }
        log::debug!("{} picked up {}", name, self.segment);
        self.observer.segment_started(name, &self.segment);

        let start = Instant::now();
        let observer = &self.observer;
        let mut sink = |update: &ProgressUpdate| observer.segment_progress(name, update);
        let count = self.job.execute(&self.segment, worker, &mut sink)?;
        let elapsed = start.elapsed();

        self.observer
            .segment_finished(name, &self.segment, count, elapsed);
        Ok(count)
    }
}
