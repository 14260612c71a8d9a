//! Cache Store Module
//!
//! Main cache engine: a HashMap of TTL entries with prefix invalidation,
//! lazy purge on read, a sweep for expired entries and an optional LRU cap.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::clock::{duration_ms, Clock, SystemClock};

// == Cache Store ==
/// Owned TTL cache. Not synchronized; share it through [`SharedCache`].
///
/// [`SharedCache`]: crate::cache::SharedCache
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Access order, only maintained when `capacity` is set
    lru: LruTracker,
    /// Running counters
    stats: CacheStats,
    /// Maximum number of entries, `None` = unbounded
    capacity: Option<usize>,
    /// TTL used when `set` is given none
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an unbounded store on the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates an unbounded store reading time from `clock`.
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity: None,
            default_ttl,
            clock,
        }
    }

    /// Caps the store at `max_entries`, evicting the least recently used
    /// entry when a new key would exceed it.
    pub fn with_capacity(mut self, max_entries: usize) -> Self {
        self.capacity = Some(max_entries.max(1));
        for key in self.entries.keys() {
            self.lru.touch(key);
        }
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Get ==
    /// Returns a clone of the live value stored under `key`.
    ///
    /// An expired entry is removed on the spot and reported absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => {
                self.remove_entry(key);
                self.stats.record_miss();
                debug!(key, "cache miss (expired)");
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                if self.capacity.is_some() {
                    self.lru.touch(key);
                }
                Some(value)
            }
            None => {
                self.stats.record_miss();
                debug!(key, "cache miss");
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any existing entry.
    ///
    /// `ttl` of `None` uses the store's default TTL. The expiry is always
    /// computed from the current time, so an overwrite restarts the clock.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let ttl_ms = duration_ms(ttl.unwrap_or(self.default_ttl));
        let now = self.clock.now_ms();

        if let Some(capacity) = self.capacity {
            if !self.entries.contains_key(&key) {
                // Dead entries give up their slots before live ones are evicted
                if self.entries.len() >= capacity {
                    let purged = self.cleanup_expired();
                    if purged > 0 {
                        debug!(purged, "cache purged expired entries to make room");
                    }
                }
                while self.entries.len() >= capacity {
                    let Some(evicted) = self.lru.evict_oldest() else {
                        break;
                    };
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                    debug!(key = %evicted, "cache eviction (capacity)");
                }
            }
            self.lru.touch(&key);
        }

        self.entries.insert(key, CacheEntry::new(value, now, ttl_ms));
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Clear ==
    /// Removes every entry. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        count
    }

    // == Invalidate By Prefix ==
    /// Removes every key starting with `prefix`. Returns how many were dropped.
    pub fn invalidate_by_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - self.entries.len();

        if removed > 0 && self.capacity.is_some() {
            self.lru.remove_where(|key| key.starts_with(prefix));
        }
        self.stats.record_invalidations(removed);
        debug!(prefix, removed, "cache prefix invalidation");
        removed
    }

    // == Stats ==
    /// Returns a snapshot of size, keys and counters.
    pub fn stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort_unstable();

        CacheStats {
            size: self.entries.len(),
            keys,
            ..self.stats.clone()
        }
    }

    // == Cleanup Expired ==
    /// Removes all entries whose lifetime has elapsed.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        if self.capacity.is_some() && self.lru.len() != self.entries.len() {
            let entries = &self.entries;
            self.lru.remove_where(|key| !entries.contains_key(key));
        }
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed && self.capacity.is_some() {
            self.lru.remove(key);
        }
        removed
    }
}
