// Sun Oct 18 2026 - Alex

pub mod console;
pub mod progress;

pub use console::ConsoleObserver;
pub use progress::SegmentProgress;
