// Sun Oct 18 2026 - Alex

use crate::engine::handle::Completion;
use crate::engine::segment::Segment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    Success(u64),
    Error(String),
}

impl TaskResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskResult::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TaskResult::Error(_))
    }

    pub fn count(&self) -> Option<u64> {
        match self {
            TaskResult::Success(count) => Some(*count),
            TaskResult::Error(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            TaskResult::Error(e) => Some(e),
            TaskResult::Success(_) => None,
        }
    }
}

/// Resolved result for one segment, produced exactly once per segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOutcome {
    pub segment: Segment,
    pub worker: Option<String>,
    pub result: TaskResult,
}

impl SegmentOutcome {
    pub fn success(segment: Segment, worker: Option<String>, count: u64) -> Self {
        Self {
            segment,
            worker,
            result: TaskResult::Success(count),
        }
    }

    pub fn failure(segment: Segment, worker: Option<String>, error: impl Into<String>) -> Self {
        Self {
            segment,
            worker,
            result: TaskResult::Error(error.into()),
        }
    }

    pub fn from_completion(segment: Segment, completion: Completion<u64>) -> Self {
        match completion.result {
            Ok(count) => Self::success(segment, completion.worker, count),
            Err(e) => Self::failure(segment, completion.worker, e.to_string()),
        }
    }

    pub fn index(&self) -> usize {
        self.segment.index()
    }

    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }

    pub fn is_error(&self) -> bool {
        self.result.is_error()
    }

    /// Amount this segment adds to the run total; failures add nothing.
    pub fn contribution(&self) -> u64 {
        self.result.count().unwrap_or(0)
    }

    /// Worker label if the segment ran, otherwise its ordinal.
    pub fn label(&self) -> String {
        match &self.worker {
            Some(worker) => worker.clone(),
            None => format!("segment {}", self.segment.ordinal()),
        }
    }
}
