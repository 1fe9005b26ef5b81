// Sun Oct 18 2026 - Alex

pub mod config;
pub mod engine;
pub mod orchestration;
pub mod primes;
pub mod ui;
pub mod utils;

pub use config::{Config, ConfigError};
pub use engine::{CancellationToken, Range, Segment, SegmentPlanner, WorkerPool};
pub use orchestration::{CompletedRun, Coordinator, CoordinatorError, RunSummary};
pub use primes::{count_primes, is_prime};
