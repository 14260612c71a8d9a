//! Shared Cache Handle
//!
//! Cloneable handle over a [`CacheStore`] guarded by a tokio `RwLock`, and
//! the cache-aside entry point route code uses for expensive reads.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};

// == Shared Cache ==
/// Thread-safe handle to one cache instance. Clones share the same store.
#[derive(Debug)]
pub struct SharedCache<V> {
    inner: Arc<RwLock<CacheStore<V>>>,
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> SharedCache<V> {
    pub fn new(store: CacheStore<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    // == Cache Aside ==
    /// Returns the cached value for `key`, or runs `fetcher`, caches its
    /// result for `ttl` (default TTL if `None`) and returns it.
    ///
    /// The lock is not held while `fetcher` runs, so two callers missing the
    /// same key concurrently both fetch and the later write wins. A fetcher
    /// error is handed back untouched and nothing is stored.
    pub async fn cache_aside<F, Fut, E>(
        &self,
        key: &str,
        fetcher: F,
        ttl: Option<Duration>,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key).await {
            debug!(key, "cache-aside hit");
            return Ok(value);
        }

        let value = fetcher().await?;
        self.set(key, value.clone(), ttl).await;
        Ok(value)
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        // Write lock: a read may purge an expired entry and bumps counters
        self.inner.write().await.get(key)
    }

    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.inner.write().await.set(key, value, ttl);
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.inner.write().await.delete(key)
    }

    pub async fn clear(&self) -> usize {
        self.inner.write().await.clear()
    }

    pub async fn invalidate_by_prefix(&self, prefix: &str) -> usize {
        self.inner.write().await.invalidate_by_prefix(prefix)
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    pub async fn cleanup_expired(&self) -> usize {
        self.inner.write().await.cleanup_expired()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn shared_with_clock() -> (SharedCache<u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let store = CacheStore::with_clock(Duration::from_secs(60), clock.clone());
        (SharedCache::new(store), clock)
    }

    #[tokio::test]
    async fn test_cache_aside_miss_then_hit() {
        let (cache, _) = shared_with_clock();
        let calls = &AtomicUsize::new(0);

        let first: Result<u32, String> = cache
            .cache_aside(
                "x",
                || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(1)
                },
                None,
            )
            .await;
        let second: Result<u32, String> = cache
            .cache_aside(
                "x",
                || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(2)
                },
                None,
            )
            .await;

        assert_eq!(first, Ok(1));
        assert_eq!(second, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_aside_refetches_after_expiry() {
        let (cache, clock) = shared_with_clock();

        let _ = cache
            .cache_aside("x", || async { Ok::<_, ()>(1) }, Some(Duration::from_secs(5)))
            .await;
        clock.advance(Duration::from_secs(5));
        let value = cache
            .cache_aside("x", || async { Ok::<_, ()>(2) }, None)
            .await;

        assert_eq!(value, Ok(2));
        assert_eq!(cache.get("x").await, Some(2));
    }

    #[tokio::test]
    async fn test_failed_fetcher_leaves_no_trace() {
        let (cache, _) = shared_with_clock();

        let result = cache
            .cache_aside("report", || async { Err::<u32, _>("backend down") }, None)
            .await;

        assert_eq!(result, Err("backend down"));
        assert!(cache.get("report").await.is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_failed_fetcher_keeps_previous_state() {
        let (cache, clock) = shared_with_clock();
        cache.set("report", 7, Some(Duration::from_secs(1))).await;
        clock.advance(Duration::from_secs(2));

        let result = cache
            .cache_aside("report", || async { Err::<u32, _>(()) }, None)
            .await;

        assert!(result.is_err());
        assert!(cache.get("report").await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let (cache, _) = shared_with_clock();
        let other = cache.clone();

        cache.set("leads:1", 1, None).await;
        cache.set("leads:2", 2, None).await;
        assert_eq!(other.invalidate_by_prefix("leads:").await, 2);
        assert_eq!(cache.stats().await.size, 0);
    }
}
