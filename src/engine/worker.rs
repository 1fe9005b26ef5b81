// Sun Oct 18 2026 - Alex

use crate::engine::cancel::CancellationToken;
use crate::engine::handle::{Completion, TaskHandle};
use crate::engine::task::TaskError;
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::sync_channel;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(600);
const FORCED_EXIT_WAIT: Duration = Duration::from_secs(1);

type Job = Box<dyn FnOnce(&WorkerContext) + Send + 'static>;
pub type NamingFn = Arc<dyn Fn(usize) -> String + Send + Sync>;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Worker pool size must be greater than 0")]
    ZeroSize,
    #[error("Failed to spawn worker thread {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Worker pool is shut down and no longer accepts tasks")]
    ShutDown,
}

/// Identity and cancellation state handed to every job a worker runs.
#[derive(Debug, Clone)]
pub struct WorkerContext {
    name: String,
    cancel: CancellationToken,
}

impl WorkerContext {
    pub fn new(name: String, cancel: CancellationToken) -> Self {
        Self { name, cancel }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShutdownReport {
    /// All workers exited within the grace period.
    pub graceful: bool,
    pub joined_workers: usize,
    /// Queued jobs dropped by forced termination.
    pub discarded_jobs: usize,
    /// Workers still running after forced termination, left detached.
    pub detached_workers: usize,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.detached_workers == 0
    }
}

impl fmt::Display for ShutdownReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.graceful {
            write!(f, "pool shut down cleanly ({} workers joined)", self.joined_workers)
        } else {
            write!(
                f,
                "pool force-terminated ({} joined, {} queued jobs discarded, {} workers detached)",
                self.joined_workers, self.discarded_jobs, self.detached_workers
            )
        }
    }
}

struct QueueState {
    jobs: VecDeque<Job>,
    accepting: bool,
    live_workers: usize,
    running_jobs: usize,
}

impl QueueState {
    fn is_idle(&self) -> bool {
        self.jobs.is_empty() && self.running_jobs == 0
    }
}

struct Shared {
    state: Mutex<QueueState>,
    job_available: Condvar,
    worker_exited: Condvar,
    cancel: CancellationToken,
}

/// Decrements the live count when a worker thread leaves its loop, even by unwinding.
struct ExitGuard {
    shared: Arc<Shared>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        state.live_workers = state.live_workers.saturating_sub(1);
        self.shared.worker_exited.notify_all();
    }
}

pub struct WorkerPoolBuilder {
    size: usize,
    naming: NamingFn,
    parent_cancel: Option<CancellationToken>,
    shutdown_grace: Duration,
}

impl WorkerPoolBuilder {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            naming: Arc::new(|index| format!("worker-{}", index + 1)),
            parent_cancel: None,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    pub fn with_naming<F>(mut self, naming: F) -> Self
    where
        F: Fn(usize) -> String + Send + Sync + 'static,
    {
        self.naming = Arc::new(naming);
        self
    }

    pub fn with_name_prefix(self, prefix: &str) -> Self {
        let prefix = prefix.to_string();
        self.with_naming(move |index| format!("{}-{}", prefix, index + 1))
    }

    /// Jobs observe `token` in addition to the pool's own forced-termination flag.
    pub fn with_cancel_token(mut self, token: &CancellationToken) -> Self {
        self.parent_cancel = Some(token.clone());
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn build(self) -> Result<WorkerPool, PoolError> {
        if self.size == 0 {
            return Err(PoolError::ZeroSize);
        }

        let cancel = match &self.parent_cancel {
            Some(parent) => parent.child(),
            None => CancellationToken::new(),
        };

        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                accepting: true,
                live_workers: 0,
                running_jobs: 0,
            }),
            job_available: Condvar::new(),
            worker_exited: Condvar::new(),
            cancel,
        });

        let mut pool = WorkerPool {
            shared,
            threads: Vec::with_capacity(self.size),
            names: Vec::with_capacity(self.size),
            shutdown_grace: self.shutdown_grace,
            next_task_id: AtomicU64::new(1),
            closed: false,
        };

        for index in 0..self.size {
            let name = (self.naming)(index);
            if let Err(source) = pool.spawn_worker(name.clone()) {
                pool.shutdown_now();
                pool.close(FORCED_EXIT_WAIT);
                return Err(PoolError::Spawn { name, source });
            }
        }

        log::debug!("Started worker pool with {} threads", self.size);
        Ok(pool)
    }
}

/// Fixed-size thread pool with a FIFO queue. Submission never blocks.
pub struct WorkerPool {
    shared: Arc<Shared>,
    threads: Vec<JoinHandle<()>>,
    names: Vec<String>,
    shutdown_grace: Duration,
    next_task_id: AtomicU64,
    closed: bool,
}

impl WorkerPool {
    pub fn builder(size: usize) -> WorkerPoolBuilder {
        WorkerPoolBuilder::new(size)
    }

    fn spawn_worker(&mut self, name: String) -> std::io::Result<()> {
        let context = WorkerContext::new(name.clone(), self.shared.cancel.clone());
        let shared = self.shared.clone();

        self.shared.state.lock().live_workers += 1;

        let spawned = thread::Builder::new()
            .name(name.clone())
            .spawn(move || WorkerPool::worker_loop(context, shared));

        match spawned {
            Ok(handle) => {
                self.threads.push(handle);
                self.names.push(name);
                Ok(())
            }
            Err(e) => {
                self.shared.state.lock().live_workers -= 1;
                Err(e)
            }
        }
    }

    fn worker_loop(context: WorkerContext, shared: Arc<Shared>) {
        let _exit = ExitGuard {
            shared: shared.clone(),
        };

        loop {
            let job = {
                let mut state = shared.state.lock();
                loop {
                    if let Some(job) = state.jobs.pop_front() {
                        state.running_jobs += 1;
                        break Some(job);
                    }
                    if !state.accepting {
                        break None;
                    }
                    shared.job_available.wait(&mut state);
                }
            };

            match job {
                Some(job) => job(&context),
                None => break,
            }
        }

        log::trace!("{} exiting", context.name());
    }

    pub fn submit<T, F>(&self, task: F) -> Result<TaskHandle<T>, PoolError>
    where
        T: Send + 'static,
        F: FnOnce(&WorkerContext) -> Result<T, TaskError> + Send + 'static,
    {
        let (sender, receiver) = sync_channel(1);
        let id = self.next_task_id.fetch_add(1, Ordering::SeqCst);
        let shared = Arc::downgrade(&self.shared);

        let job: Job = Box::new(move |context: &WorkerContext| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| task(context)))
                .unwrap_or_else(|payload| {
                    Err(TaskError::Panicked(panic_message(payload.as_ref())))
                });

            // the pool is idle before the last result becomes visible
            if let Some(shared) = shared.upgrade() {
                shared.state.lock().running_jobs -= 1;
            }
            let _ = sender.send(Completion {
                worker: Some(context.name().to_string()),
                result,
            });
        });

        {
            let mut state = self.shared.state.lock();
            if !state.accepting {
                return Err(PoolError::ShutDown);
            }
            state.jobs.push_back(job);
        }
        self.shared.job_available.notify_one();

        Ok(TaskHandle::new(id, receiver))
    }

    pub fn size(&self) -> usize {
        self.names.len()
    }

    pub fn worker_names(&self) -> &[String] {
        &self.names
    }

    pub fn live_workers(&self) -> usize {
        self.shared.state.lock().live_workers
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.shared.cancel
    }

    pub fn shutdown_grace(&self) -> Duration {
        self.shutdown_grace
    }

    /// Stops accepting tasks. Queued and running tasks still complete.
    pub fn shutdown(&self) {
        self.shared.state.lock().accepting = false;
        self.shared.job_available.notify_all();
    }

    /// Drops every queued task and cancels running ones. Returns the number dropped.
    pub fn shutdown_now(&self) -> usize {
        let dropped: Vec<Job> = {
            let mut state = self.shared.state.lock();
            state.accepting = false;
            state.jobs.drain(..).collect()
        };
        self.shared.cancel.cancel();
        self.shared.job_available.notify_all();
        dropped.len()
    }

    /// Waits until every worker has exited. Returns `false` if `timeout` elapsed first.
    pub fn await_termination(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();

        while state.live_workers > 0 {
            if self
                .shared
                .worker_exited
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                return state.live_workers == 0;
            }
        }
        true
    }

    /// Orderly stop, bounded wait, then forced termination. Idempotent.
    pub fn close(&mut self, grace: Duration) -> ShutdownReport {
        if self.closed {
            return ShutdownReport {
                graceful: true,
                ..ShutdownReport::default()
            };
        }
        self.closed = true;

        self.shutdown();
        let mut graceful = self.await_termination(grace);

        // nothing queued or running: workers are only on their way out
        if !graceful && self.shared.state.lock().is_idle() {
            graceful = self.await_termination(FORCED_EXIT_WAIT);
        }

        let mut discarded_jobs = 0;
        if !graceful {
            log::warn!(
                "Timed out after {:.1}s waiting for tasks to finish, forcing shutdown",
                grace.as_secs_f64()
            );
            discarded_jobs = self.shutdown_now();
            self.await_termination(FORCED_EXIT_WAIT);
        }

        // live count reaches zero just before each thread returns, so joining is safe
        let all_exited = self.live_workers() == 0;
        let mut joined_workers = 0;
        let mut detached_workers = 0;
        for handle in self.threads.drain(..) {
            if all_exited || handle.is_finished() {
                let _ = handle.join();
                joined_workers += 1;
            } else {
                detached_workers += 1;
            }
        }

        if detached_workers > 0 {
            log::warn!("{} worker threads did not stop and were detached", detached_workers);
        }

        ShutdownReport {
            graceful,
            joined_workers,
            discarded_jobs,
            detached_workers,
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let grace = self.shutdown_grace;
        self.close(grace);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
