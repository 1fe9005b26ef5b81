// Sun Oct 18 2026 - Alex

use crate::engine::result::SegmentOutcome;

/// Outcomes in collection order. Collection order is segment order, so the
/// position of each outcome equals its segment index.
#[derive(Debug, Clone, Default)]
pub struct ResultCollector {
    outcomes: Vec<SegmentOutcome>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(segments: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(segments),
        }
    }

    pub fn record(&mut self, outcome: SegmentOutcome) {
        debug_assert_eq!(
            outcome.index(),
            self.outcomes.len(),
            "segments must be collected in submission order"
        );
        self.outcomes.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn into_outcomes(self) -> Vec<SegmentOutcome> {
        self.outcomes
    }

    pub fn total(&self) -> u64 {
        self.outcomes.iter().map(SegmentOutcome::contribution).sum()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn errors(&self) -> Vec<&SegmentOutcome> {
        self.outcomes.iter().filter(|o| o.is_error()).collect()
    }
}
