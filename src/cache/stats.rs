//! Cache Statistics Module
//!
//! Diagnostic snapshot of a cache: its size, its key set, and the running
//! hit/miss/eviction/invalidation counters.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache contents and counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current number of stored entries, expired-but-unswept ones included
    pub size: usize,
    /// Current keys, sorted
    pub keys: Vec<String>,
    /// Number of lookups that found a live entry
    pub hits: u64,
    /// Number of lookups that found nothing or an expired entry
    pub misses: u64,
    /// Number of entries dropped to stay within capacity
    pub evictions: u64,
    /// Number of entries removed by prefix invalidation
    pub invalidations: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_invalidations(&mut self, count: usize) {
        self.invalidations += count as u64;
    }
}
