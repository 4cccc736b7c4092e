//! Blocking delay primitive
//!
//! Sequence settle times are blocking sleeps on the calling thread. The
//! trait seam exists so tests can observe delay placement relative to pin
//! assertions; production code uses [`ThreadDelay`].

use std::time::Duration;

/// Millisecond-granularity blocking sleep
pub trait Delay: Send + Sync {
    fn sleep_ms(&self, ms: u32);
}

/// Delay backed by `std::thread::sleep`
#[derive(Debug, Default)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn sleep_ms(&self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
