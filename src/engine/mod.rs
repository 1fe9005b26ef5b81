// Sun Oct 18 2026 - Alex

pub mod cancel;
pub mod handle;
pub mod result;
pub mod scheduler;
pub mod segment;
pub mod task;
pub mod worker;

pub use cancel::CancellationToken;
pub use handle::{Completion, TaskHandle, WaitCancelled};
pub use result::{SegmentOutcome, TaskResult};
pub use scheduler::{PendingSegment, TaskScheduler};
pub use segment::{plan_segments, PlanError, Range, Segment, SegmentPlanner};
pub use task::{PrimeCountJob, SegmentJob, SegmentTask, TaskError};
pub use worker::{PoolError, ShutdownReport, WorkerContext, WorkerPool, WorkerPoolBuilder};
