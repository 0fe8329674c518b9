//! Redraw rate limiting.
//!
//! Requests inside the interval are dropped, not queued: the next granted
//! redraw draws whatever the state is by then.

/// Grants at most one redraw per interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedrawThrottle {
    interval_ms: f64,
    last: Option<f64>,
}

impl RedrawThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Timestamp of the last granted request.
    pub fn last_granted(&self) -> Option<f64> {
        self.last
    }

    /// Ask to redraw at `now_ms`.
    ///
    /// Granted if nothing was granted yet or more than the interval has
    /// passed since the last grant. A clock that goes backwards is treated
    /// as a fresh start.
    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        let granted = match self.last {
            None => true,
            Some(last) => now_ms - last > self.interval_ms || now_ms < last,
        };
        if granted {
            self.last = Some(now_ms);
        }
        granted
    }

    /// Forget the last grant so the next request always succeeds.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
