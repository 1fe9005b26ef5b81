// Sun Oct 18 2026 - Alex

pub mod aggregator;
pub mod collector;
pub mod coordinator;
pub mod observer;

pub use aggregator::{ResultAggregator, RunSummary};
pub use collector::ResultCollector;
pub use coordinator::{CompletedRun, Coordinator, CoordinatorError};
pub use observer::{RunObserver, RunPlan, SilentObserver};
