// Sun Oct 18 2026 - Alex

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid range: low {low} is greater than high {high}")]
    InvalidRange { low: u64, high: u64 },
    #[error("Upper limit must be greater than 0")]
    ZeroUpperLimit,
    #[error("Segment size must be greater than 0")]
    ZeroSegmentSize,
}

/// Inclusive numeric range `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    low: u64,
    high: u64,
}

impl Range {
    pub fn new(low: u64, high: u64) -> Result<Self, PlanError> {
        if low > high {
            return Err(PlanError::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> u64 {
        self.low
    }

    pub fn high(&self) -> u64 {
        self.high
    }

    /// Number of integers covered. Saturates for `[0, u64::MAX]`.
    pub fn span(&self) -> u64 {
        (self.high - self.low).saturating_add(1)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    index: usize,
    range: Range,
}

impl Segment {
    pub fn new(index: usize, range: Range) -> Self {
        Self { index, range }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// One-based ordinal used in console output.
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    pub fn low(&self) -> u64 {
        self.range.low
    }

    pub fn high(&self) -> u64 {
        self.range.high
    }

    pub fn span(&self) -> u64 {
        self.range.span()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment {} {}", self.ordinal(), self.range)
    }
}

/// Splits `[1, upper_limit]` into contiguous segments of `segment_size` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentPlanner {
    upper_limit: u64,
    segment_size: u64,
}

impl SegmentPlanner {
    pub fn new(upper_limit: u64, segment_size: u64) -> Result<Self, PlanError> {
        if upper_limit == 0 {
            return Err(PlanError::ZeroUpperLimit);
        }
        if segment_size == 0 {
            return Err(PlanError::ZeroSegmentSize);
        }
        Ok(Self {
            upper_limit,
            segment_size,
        })
    }

    pub fn upper_limit(&self) -> u64 {
        self.upper_limit
    }

    pub fn segment_size(&self) -> u64 {
        self.segment_size
    }

    pub fn segment_count(&self) -> usize {
        self.upper_limit.div_ceil(self.segment_size) as usize
    }

    pub fn segments(&self) -> Segments {
        Segments {
            planner: *self,
            next_index: 0,
            count: self.segment_count(),
        }
    }

    pub fn plan(&self) -> Vec<Segment> {
        self.segments().collect()
    }

    fn segment_at(&self, index: usize) -> Segment {
        // index < segment_count, so index * segment_size <= upper_limit - 1
        let low = index as u64 * self.segment_size + 1;
        let high = self
            .upper_limit
            .min(low.saturating_add(self.segment_size - 1));
        Segment::new(index, Range { low, high })
    }
}

pub struct Segments {
    planner: SegmentPlanner,
    next_index: usize,
    count: usize,
}

impl Iterator for Segments {
    type Item = Segment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.count {
            return None;
        }
        let segment = self.planner.segment_at(self.next_index);
        self.next_index += 1;
        Some(segment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Segments {}

pub fn plan_segments(upper_limit: u64, segment_size: u64) -> Result<Vec<Segment>, PlanError> {
    Ok(SegmentPlanner::new(upper_limit, segment_size)?.plan())
}
