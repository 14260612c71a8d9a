//! Rate Limiter Module
//!
//! Fixed-window request counter keyed by client identity.
//!
//! Each key gets `max_requests` per window. The counter resets when the
//! window ends, so a client can spend a full quota at the end of one window
//! and another right after the boundary.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::clock::{duration_ms, Clock, SystemClock};
use crate::ratelimit::RateLimitRecord;

// == Config ==
/// Window length and per-window cap of one limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl RateLimitConfig {
    pub const fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
        }
    }
}

// == Decision ==
/// Outcome of one `is_allowed` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// End of the client's current window (Unix milliseconds)
    pub reset_time: u64,
    /// Requests left in the current window
    pub remaining: u32,
    /// Per-window cap
    pub limit: u32,
}

impl RateLimitDecision {
    /// Milliseconds from `now` until the window resets.
    pub fn retry_after_ms(&self, now: u64) -> u64 {
        self.reset_time.saturating_sub(now)
    }
}

// == Rate Limiter ==
/// Owned limiter state. Not synchronized; share it through [`SharedRateLimiter`].
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    records: HashMap<String, RateLimitRecord>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            records: HashMap::new(),
            clock,
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    // == Is Allowed ==
    /// Counts one request from `key` and decides whether it may proceed.
    ///
    /// A denied request is not counted.
    pub fn is_allowed(&mut self, key: &str) -> RateLimitDecision {
        let now = self.clock.now_ms();
        let limit = self.config.max_requests;
        let window_ms = duration_ms(self.config.window);

        match self.records.get_mut(key) {
            Some(record) if !record.is_expired_at(now) => {
                if record.count < limit {
                    record.count += 1;
                    RateLimitDecision {
                        allowed: true,
                        reset_time: record.window_reset_at,
                        remaining: limit - record.count,
                        limit,
                    }
                } else {
                    RateLimitDecision {
                        allowed: false,
                        reset_time: record.window_reset_at,
                        remaining: 0,
                        limit,
                    }
                }
            }
            _ => {
                let record = RateLimitRecord::open(now, window_ms);
                self.records.insert(key.to_string(), record);
                RateLimitDecision {
                    allowed: true,
                    reset_time: record.window_reset_at,
                    remaining: limit.saturating_sub(1),
                    limit,
                }
            }
        }
    }

    // == Cleanup ==
    /// Drops every record whose window has ended. Returns how many.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired_at(now));
        before - self.records.len()
    }

    /// Current record for `key`, expired or not.
    pub fn record(&self, key: &str) -> Option<RateLimitRecord> {
        self.records.get(key).copied()
    }

    /// Forgets every client.
    pub fn reset(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// == Shared Rate Limiter ==
/// Cloneable, thread-safe handle to one limiter.
#[derive(Debug, Clone)]
pub struct SharedRateLimiter {
    inner: Arc<RwLock<RateLimiter>>,
}

impl SharedRateLimiter {
    pub fn new(limiter: RateLimiter) -> Self {
        Self {
            inner: Arc::new(RwLock::new(limiter)),
        }
    }

    pub async fn is_allowed(&self, key: &str) -> RateLimitDecision {
        self.inner.write().await.is_allowed(key)
    }

    pub async fn cleanup(&self) -> usize {
        self.inner.write().await.cleanup()
    }

    pub async fn reset(&self) {
        self.inner.write().await.reset();
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn config(&self) -> RateLimitConfig {
        self.inner.read().await.config()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn limiter(window_ms: u64, max_requests: u32) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(50_000));
        let config = RateLimitConfig::new(Duration::from_millis(window_ms), max_requests);
        (RateLimiter::with_clock(config, clock.clone()), clock)
    }

    #[test]
    fn test_fixed_window_denies_after_max() {
        let (mut limiter, _) = limiter(1_000, 3);

        let allowed: Vec<bool> = (0..4).map(|_| limiter.is_allowed("c1").allowed).collect();

        assert_eq!(allowed, vec![true, true, true, false]);
        assert_eq!(limiter.record("c1").map(|r| r.count), Some(3));
    }

    #[test]
    fn test_window_resets_after_reset_time() {
        let (mut limiter, clock) = limiter(1_000, 3);
        for _ in 0..4 {
            limiter.is_allowed("c1");
        }
        let denied = limiter.is_allowed("c1");
        assert!(!denied.allowed);
        assert_eq!(denied.reset_time, 51_000);

        clock.set(denied.reset_time + 1);
        let decision = limiter.is_allowed("c1");

        assert!(decision.allowed);
        assert_eq!(limiter.record("c1").map(|r| r.count), Some(1));
        assert_eq!(decision.reset_time, 51_001 + 1_000);
    }

    #[test]
    fn test_remaining_counts_down() {
        let (mut limiter, _) = limiter(1_000, 3);

        let remaining: Vec<u32> = (0..4).map(|_| limiter.is_allowed("c1").remaining).collect();

        assert_eq!(remaining, vec![2, 1, 0, 0]);
        assert_eq!(limiter.is_allowed("c1").limit, 3);
    }

    #[test]
    fn test_keys_are_isolated() {
        let (mut limiter, _) = limiter(1_000, 2);
        limiter.is_allowed("c1");
        limiter.is_allowed("c1");
        assert!(!limiter.is_allowed("c1").allowed);

        assert!(limiter.is_allowed("c2").allowed);
        assert!(limiter.is_allowed("c2").allowed);
    }

    #[test]
    fn test_boundary_burst_is_permitted() {
        let (mut limiter, clock) = limiter(1_000, 2);

        assert!(limiter.is_allowed("c1").allowed);
        clock.advance(Duration::from_millis(999));
        assert!(limiter.is_allowed("c1").allowed);
        assert!(!limiter.is_allowed("c1").allowed);

        // Two more straight after the boundary: 4 requests in ~1ms
        clock.advance(Duration::from_millis(1));
        assert!(limiter.is_allowed("c1").allowed);
        assert!(limiter.is_allowed("c1").allowed);
        assert!(!limiter.is_allowed("c1").allowed);
    }

    #[test]
    fn test_zero_max_requests_still_admits_window_opener() {
        let (mut limiter, _) = limiter(1_000, 0);

        let first = limiter.is_allowed("c1");
        assert!(first.allowed);
        assert_eq!(first.remaining, 0);
        assert!(!limiter.is_allowed("c1").allowed);
    }

    #[test]
    fn test_cleanup_removes_only_ended_windows() {
        let (mut limiter, clock) = limiter(1_000, 5);
        limiter.is_allowed("old");
        clock.advance(Duration::from_millis(600));
        limiter.is_allowed("fresh");
        clock.advance(Duration::from_millis(400));

        assert_eq!(limiter.cleanup(), 1);
        assert!(limiter.record("old").is_none());
        assert!(limiter.record("fresh").is_some());
    }

    #[test]
    fn test_empty_key_is_a_valid_key() {
        let (mut limiter, _) = limiter(1_000, 1);
        assert!(limiter.is_allowed("").allowed);
        assert!(!limiter.is_allowed("").allowed);
    }

    #[test]
    fn test_retry_after_ms() {
        let decision = RateLimitDecision {
            allowed: false,
            reset_time: 10_500,
            remaining: 0,
            limit: 1,
        };
        assert_eq!(decision.retry_after_ms(10_000), 500);
        assert_eq!(decision.retry_after_ms(11_000), 0);
    }

    #[tokio::test]
    async fn test_shared_limiter_reset() {
        let (limiter, _) = limiter(1_000, 1);
        let shared = SharedRateLimiter::new(limiter);

        assert!(shared.is_allowed("c1").await.allowed);
        assert!(!shared.is_allowed("c1").await.allowed);

        shared.reset().await;
        assert_eq!(shared.len().await, 0);
        assert!(shared.is_allowed("c1").await.allowed);
    }
}
