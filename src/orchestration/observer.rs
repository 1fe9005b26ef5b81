// Sun Oct 18 2026 - Alex

use crate::engine::result::SegmentOutcome;
use crate::engine::segment::Segment;
use crate::engine::worker::ShutdownReport;
use crate::orchestration::aggregator::RunSummary;
use crate::primes::ProgressUpdate;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub pool_size: usize,
    pub upper_limit: u64,
    pub segment_size: u64,
    pub segment_count: usize,
}

/// Receives run events. Worker-side callbacks arrive concurrently from pool threads;
/// `segment_collected` arrives on the coordinating thread in segment order.
pub trait RunObserver: Send + Sync {
    fn run_started(&self, _plan: &RunPlan) {}

    fn segment_submitted(&self, _segment: &Segment) {}

    fn segment_started(&self, _worker: &str, _segment: &Segment) {}

    fn segment_progress(&self, _worker: &str, _update: &ProgressUpdate) {}

    fn segment_finished(
        &self,
        _worker: &str,
        _segment: &Segment,
        _count: u64,
        _elapsed: Duration,
    ) {
    }

    fn segment_collected(&self, _outcome: &SegmentOutcome) {}

    fn run_finished(&self, _summary: &RunSummary) {}

    fn pool_shutdown(&self, _report: &ShutdownReport) {}
}

pub struct SilentObserver;

impl RunObserver for SilentObserver {}
