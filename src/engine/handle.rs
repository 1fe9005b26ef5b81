// Sun Oct 18 2026 - Alex

use crate::engine::cancel::CancellationToken;
use crate::engine::task::TaskError;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Value delivered by a finished task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion<T> {
    /// Label of the worker that ran the task; `None` if it never ran.
    pub worker: Option<String>,
    pub result: Result<T, TaskError>,
}

impl<T> Completion<T> {
    fn abandoned() -> Self {
        Self {
            worker: None,
            result: Err(TaskError::Abandoned),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Wait for task result was cancelled")]
pub struct WaitCancelled;

/// Receiving end of a submitted task.
///
/// If the task is dropped without running (forced shutdown), waiting resolves to
/// `TaskError::Abandoned` instead of blocking forever.
pub struct TaskHandle<T> {
    id: u64,
    receiver: Receiver<Completion<T>>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(id: u64, receiver: Receiver<Completion<T>>) -> Self {
        Self { id, receiver }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn wait(self) -> Completion<T> {
        self.receiver.recv().unwrap_or_else(|_| Completion::abandoned())
    }

    /// Blocks until the task completes or `cancel` fires, checking the token every
    /// `poll_interval`.
    pub fn wait_cancellable(
        self,
        cancel: &CancellationToken,
        poll_interval: Duration,
    ) -> Result<Completion<T>, WaitCancelled> {
        loop {
            if cancel.is_cancelled() {
                return Err(WaitCancelled);
            }

            match self.receiver.recv_timeout(poll_interval) {
                Ok(completion) => return Ok(completion),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Ok(Completion::abandoned()),
            }
        }
    }
}
