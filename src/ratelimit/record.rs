//! Rate Limit Record Module
//!
//! Per-client counter for the current fixed window.

// == Rate Limit Record ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    /// Requests admitted in the current window
    pub count: u32,
    /// End of the current window (Unix milliseconds)
    pub window_reset_at: u64,
}

impl RateLimitRecord {
    /// Opens a fresh window at `now` holding one request.
    pub fn open(now: u64, window_ms: u64) -> Self {
        Self {
            count: 1,
            window_reset_at: now.saturating_add(window_ms),
        }
    }

    /// A window is over once `now` reaches its reset time.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.window_reset_at
    }
}
