//! Millisecond timestamps for frames and timer wakeups.

use web_time::Instant;

/// Source of monotonic milliseconds since an arbitrary epoch.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall-independent clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
