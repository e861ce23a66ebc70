use std::time::{Duration, Instant};

/// Utility for keeping track of the time it took to perform some operation.
pub struct Timer {
    start_time: Instant,
}

impl Timer {
    /// Create a new `Timer`.
    pub fn now() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Time elapsed since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
