//! Cache Entry Module
//!
//! A stored value together with the time it was written and its lifetime.

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value, opaque to the cache
    pub value: V,
    /// Insertion timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Lifetime in milliseconds
    pub ttl_ms: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stored at `now` that lives for `ttl_ms`.
    pub fn new(value: V, now: u64, ttl_ms: u64) -> Self {
        Self {
            value,
            stored_at: now,
            ttl_ms,
        }
    }

    // == Expires At ==
    /// Absolute expiry timestamp (Unix milliseconds).
    pub fn expires_at(&self) -> u64 {
        self.stored_at.saturating_add(self.ttl_ms)
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is visible only while `now < stored_at + ttl`, so the exact
    /// expiry instant already counts as expired.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.expires_at()
    }

    // == Time To Live ==
    /// Returns remaining lifetime in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self, now: u64) -> u64 {
        self.expires_at().saturating_sub(now)
    }
}
