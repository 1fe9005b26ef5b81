// Sun Oct 18 2026 - Alex

pub mod progress;
pub mod trial;

pub use progress::{NoProgress, ProgressInterval, ProgressSink, ProgressUpdate};
pub use trial::{count_primes, is_prime, PrimeCounter};
