// Sun Oct 18 2026 - Alex

use crate::engine::cancel::CancellationToken;
use crate::engine::handle::{Completion, TaskHandle, WaitCancelled};
use crate::engine::segment::Segment;
use crate::engine::task::{SegmentJob, SegmentTask};
use crate::engine::worker::{PoolError, WorkerContext, WorkerPool};
use crate::orchestration::observer::RunObserver;
use std::sync::Arc;
use std::time::Duration;

/// A submitted segment and the handle its result arrives on.
pub struct PendingSegment {
    segment: Segment,
    handle: TaskHandle<u64>,
}

impl PendingSegment {
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn wait(
        self,
        cancel: &CancellationToken,
        poll_interval: Duration,
    ) -> Result<(Segment, Completion<u64>), WaitCancelled> {
        let completion = self.handle.wait_cancellable(cancel, poll_interval)?;
        Ok((self.segment, completion))
    }
}

pub struct TaskScheduler<'a> {
    pool: &'a WorkerPool,
    job: Arc<dyn SegmentJob>,
    observer: Arc<dyn RunObserver>,
}

impl<'a> TaskScheduler<'a> {
    pub fn new(
        pool: &'a WorkerPool,
        job: Arc<dyn SegmentJob>,
        observer: Arc<dyn RunObserver>,
    ) -> Self {
        Self {
            pool,
            job,
            observer,
        }
    }

    pub fn submit(&self, segment: Segment) -> Result<PendingSegment, PoolError> {
        let task = SegmentTask::new(segment, self.job.clone(), self.observer.clone());
        let handle = self
            .pool
            .submit(move |worker: &WorkerContext| task.execute(worker))?;

        log::debug!("Submitted {} as task {}", segment, handle.id());
        self.observer.segment_submitted(&segment);

        Ok(PendingSegment { segment, handle })
    }

    /// Submits in iteration order; the returned handles keep that order.
    pub fn submit_batch<I>(&self, segments: I) -> Result<Vec<PendingSegment>, PoolError>
    where
        I: IntoIterator<Item = Segment>,
    {
        let segments = segments.into_iter();
        let mut pending = Vec::with_capacity(segments.size_hint().0);

        for segment in segments {
            pending.push(self.submit(segment)?);
        }

        Ok(pending)
    }
}
