//! Cache Module
//!
//! In-memory TTL cache with cache-aside reads, prefix invalidation and an
//! optional LRU capacity.

mod entry;
pub mod keys;
mod lru;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use keys::{item_key, list_key, resource_prefix, CacheTtl, ListQuery, SortOrder};
pub use lru::LruTracker;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::CacheStore;
