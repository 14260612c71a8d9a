//! LRU Tracker Module
//!
//! Access-order bookkeeping used when a cache is given a capacity.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks access order for capacity eviction.
///
/// Front = most recently used, back = least recently used.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    /// Drops every key matching `predicate`.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&str) -> bool) {
        self.order.retain(|k| !predicate(k));
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Evict Oldest ==
    /// Returns and forgets the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
