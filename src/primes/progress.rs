// Sun Oct 18 2026 - Alex

use crate::engine::segment::Range;

pub const DEFAULT_PROGRESS_STEPS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub range: Range,
    pub processed: u64,
    pub total: u64,
    pub percent: u64,
}

pub trait ProgressSink {
    fn report(&mut self, update: &ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressUpdate),
{
    fn report(&mut self, update: &ProgressUpdate) {
        self(update)
    }
}

pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _update: &ProgressUpdate) {}
}

/// Reporting cadence for a segment: one report every `total / steps` values,
/// never less than one value apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressInterval {
    total: u64,
    step: u64,
}

impl ProgressInterval {
    pub fn new(total: u64, steps: u64) -> Self {
        let step = (total / steps.max(1)).max(1);
        Self { total, step }
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn is_due(&self, processed: u64) -> bool {
        processed % self.step == 0
    }

    pub fn percent(&self, processed: u64) -> u64 {
        if self.total == 0 {
            return 100;
        }
        ((processed as u128 * 100) / self.total as u128) as u64
    }

    pub fn update(&self, range: Range, processed: u64) -> ProgressUpdate {
        ProgressUpdate {
            range,
            processed,
            total: self.total,
            percent: self.percent(processed),
        }
    }
}
