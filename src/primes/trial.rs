// Sun Oct 18 2026 - Alex

use crate::engine::cancel::CancellationToken;
use crate::engine::segment::Range;
use crate::engine::task::TaskError;
use crate::primes::progress::{ProgressInterval, ProgressSink, DEFAULT_PROGRESS_STEPS};

/// Trial division against odd divisors up to `floor(sqrt(n))`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }

    let mut divisor = 3;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

pub fn count_primes(range: &Range) -> u64 {
    (range.low()..=range.high()).filter(|&n| is_prime(n)).count() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeCounter {
    progress_steps: u64,
}

impl PrimeCounter {
    pub fn new() -> Self {
        Self {
            progress_steps: DEFAULT_PROGRESS_STEPS,
        }
    }

    pub fn with_progress_steps(mut self, steps: u64) -> Self {
        self.progress_steps = steps.max(1);
        self
    }

    /// Counts primes in `range`, reporting to `sink` at each progress step.
    ///
    /// The token is only checked at progress points, so a cancelled count stops
    /// within one step.
    pub fn count(
        &self,
        range: &Range,
        sink: &mut dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<u64, TaskError> {
        let interval = ProgressInterval::new(range.span(), self.progress_steps);
        let mut count = 0u64;
        let mut processed = 0u64;

        for n in range.low()..=range.high() {
            if is_prime(n) {
                count += 1;
            }
            processed += 1;

            if interval.is_due(processed) {
                sink.report(&interval.update(*range, processed));
                if cancel.is_cancelled() {
                    return Err(TaskError::Cancelled);
                }
            }
        }

        Ok(count)
    }
}

impl Default for PrimeCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::segment::plan_segments;
    use crate::primes::progress::{NoProgress, ProgressUpdate};

    fn range(low: u64, high: u64) -> Range {
        Range::new(low, high).unwrap()
    }

    #[test]
    fn test_is_prime_small_values() {
        let primes: Vec<u64> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_is_prime_squares_and_large() {
        assert!(!is_prime(9));
        assert!(!is_prime(25));
        assert!(!is_prime(49));
        assert!(!is_prime(1_000_000_007 * 3));
        assert!(is_prime(1_000_000_007));
        assert!(is_prime(2_147_483_647));
    }

    #[test]
    fn test_reference_counts() {
        assert_eq!(count_primes(&range(1, 100)), 25);
        assert_eq!(count_primes(&range(2, 2)), 1);
        assert_eq!(count_primes(&range(1, 1)), 0);
        assert_eq!(count_primes(&range(1, 1000)), 168);
    }

    #[test]
    fn test_segmentation_does_not_change_total() {
        let whole = count_primes(&range(1, 1000));
        let segmented: u64 = plan_segments(1000, 100)
            .unwrap()
            .iter()
            .map(|segment| count_primes(segment.range()))
            .sum();
        assert_eq!(segmented, whole);
        assert_eq!(segmented, 168);
    }

    #[test]
    fn test_counter_matches_pure_count() {
        let counter = PrimeCounter::new();
        let token = CancellationToken::new();
        let r = range(1, 10_000);

        let observed = counter.count(&r, &mut NoProgress, &token).unwrap();
        assert_eq!(observed, count_primes(&r));
        assert_eq!(observed, 1229);
    }

    #[test]
    fn test_progress_reported_every_ten_percent() {
        let counter = PrimeCounter::new();
        let token = CancellationToken::new();
        let mut updates: Vec<ProgressUpdate> = Vec::new();

        let mut sink = |update: &ProgressUpdate| updates.push(*update);
        let count = counter.count(&range(1, 100), &mut sink, &token).unwrap();

        assert_eq!(count, 25);
        assert_eq!(updates.len(), 10);
        assert_eq!(updates[0].processed, 10);
        assert_eq!(updates[0].percent, 10);
        assert_eq!(updates[9].processed, 100);
        assert_eq!(updates[9].percent, 100);
        assert!(updates.iter().all(|u| u.total == 100));
    }

    #[test]
    fn test_short_segment_reports_each_value() {
        let counter = PrimeCounter::new();
        let token = CancellationToken::new();
        let mut reports = 0;

        let mut sink = |_: &ProgressUpdate| reports += 1;
        counter.count(&range(11, 15), &mut sink, &token).unwrap();

        assert_eq!(reports, 5);
    }

    #[test]
    fn test_cancelled_count_stops_at_progress_point() {
        let counter = PrimeCounter::new().with_progress_steps(4);
        let token = CancellationToken::new();
        token.cancel();
        let mut reports = 0;

        let mut sink = |_: &ProgressUpdate| reports += 1;
        let result = counter.count(&range(1, 400), &mut sink, &token);

        assert_eq!(result, Err(TaskError::Cancelled));
        assert_eq!(reports, 1);
    }
}
