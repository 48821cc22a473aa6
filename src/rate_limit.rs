use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

// Current fixed window: when it started and how many calls it has seen
#[derive(Debug)]
struct Window {
    start: Instant,
    count: u64,
}

// Fixed-window limiter shared by every caller of a protected operation.
//
// Only the window start and call count are stored, so the same limiter can
// be asked with different limits and intervals. Denied calls still count.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    window: Mutex<Window>,
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            window: Mutex::new(Window { start, count: 0 }),
        }
    }

    pub fn allow(&self, limit: u64, interval: Duration) -> bool {
        self.allow_at(limit, interval, Instant::now())
    }

    pub fn allow_at(&self, limit: u64, interval: Duration, now: Instant) -> bool {
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);

        // window expired..? reset it, boundary included
        if now.saturating_duration_since(window.start) >= interval {
            window.count = 0;
            window.start = now;
        }

        window.count = window.count.saturating_add(1);
        window.count <= limit
    }

    // Calls seen in the current window, denied ones included
    pub fn count(&self) -> u64 {
        self.window
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .count
    }
}
