// Sun Oct 18 2026 - Alex

use crate::engine::result::SegmentOutcome;
use crate::orchestration::collector::ResultCollector;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub upper_limit: u64,
    pub total_primes: u64,
    pub elapsed: Duration,
    pub pool_size: usize,
    pub segment_count: usize,
    pub succeeded: usize,
    pub outcomes: Vec<SegmentOutcome>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.segment_count - self.succeeded
    }

    pub fn failures(&self) -> impl Iterator<Item = &SegmentOutcome> {
        self.outcomes.iter().filter(|o| o.is_error())
    }

    pub fn is_complete(&self) -> bool {
        self.succeeded == self.segment_count
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn count_for(&self, index: usize) -> Option<u64> {
        self.outcomes.get(index).and_then(|o| o.result.count())
    }

    pub fn total_line(&self) -> String {
        format!("Primes up to {}: {}", self.upper_limit, self.total_primes)
    }

    pub fn timing_line(&self) -> String {
        format!(
            "Elapsed time: {:.3} s (threads={}, segments={})",
            self.elapsed_secs(),
            self.pool_size,
            self.segment_count
        )
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.total_line())?;
        write!(f, "{}", self.timing_line())
    }
}

pub struct ResultAggregator {
    upper_limit: u64,
    pool_size: usize,
}

impl ResultAggregator {
    pub fn new(upper_limit: u64, pool_size: usize) -> Self {
        Self {
            upper_limit,
            pool_size,
        }
    }

    pub fn summarize(&self, collector: ResultCollector, elapsed: Duration) -> RunSummary {
        let total_primes = collector.total();
        let succeeded = collector.success_count();
        let outcomes = collector.into_outcomes();

        RunSummary {
            upper_limit: self.upper_limit,
            total_primes,
            elapsed,
            pool_size: self.pool_size,
            segment_count: outcomes.len(),
            succeeded,
            outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::segment::plan_segments;

    #[test]
    fn test_summarize() {
        let segments = plan_segments(1000, 250).unwrap();
        let mut collector = ResultCollector::new();
        collector.record(SegmentOutcome::success(segments[0], None, 53));
        collector.record(SegmentOutcome::success(segments[1], None, 42));
        collector.record(SegmentOutcome::failure(segments[2], None, "Task was cancelled"));
        collector.record(SegmentOutcome::success(segments[3], None, 37));

        let summary =
            ResultAggregator::new(1000, 4).summarize(collector, Duration::from_millis(1500));

        assert_eq!(summary.total_primes, 132);
        assert_eq!(summary.segment_count, 4);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.is_complete());
        assert_eq!(summary.count_for(1), Some(42));
        assert_eq!(summary.count_for(2), None);
        assert_eq!(summary.failures().count(), 1);
        assert_eq!(
            summary.to_string(),
            "Primes up to 1000: 132\nElapsed time: 1.500 s (threads=4, segments=4)"
        );
    }
}
