//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple model over arbitrary
//! key sets, operation sequences and clock movements.

use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheStore, SharedCache};
use crate::clock::ManualClock;

// == Test Configuration ==
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
fn resource_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["leads", "customers", "orders", "products"])
        .prop_map(str::to_string)
}

/// Keys shaped like `<resource>:<suffix>`
fn cache_key_strategy() -> impl Strategy<Value = String> {
    (resource_strategy(), "[a-z0-9:]{0,12}").prop_map(|(r, s)| format!("{r}:{s}"))
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32, ttl_ms: u64 },
    Get { key: String },
    Delete { key: String },
    Invalidate { resource: String },
    Advance { ms: u64 },
    Sweep,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (cache_key_strategy(), any::<u32>(), 1u64..5_000)
            .prop_map(|(key, value, ttl_ms)| CacheOp::Set { key, value, ttl_ms }),
        cache_key_strategy().prop_map(|key| CacheOp::Get { key }),
        cache_key_strategy().prop_map(|key| CacheOp::Delete { key }),
        resource_strategy().prop_map(|resource| CacheOp::Invalidate { resource }),
        (0u64..3_000).prop_map(|ms| CacheOp::Advance { ms }),
        Just(CacheOp::Sweep),
    ]
}

fn store_with_clock() -> (CacheStore<u32>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_000_000));
    (CacheStore::with_clock(TEST_DEFAULT_TTL, clock.clone()), clock)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // *For any* sequence of operations, every `get` agrees with a model that
    // stores (value, expires_at) and treats `now >= expires_at` as absent.
    #[test]
    fn prop_matches_expiry_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let (mut store, clock) = store_with_clock();
        let mut model: BTreeMap<String, (u32, u64)> = BTreeMap::new();
        let mut now = 1_000_000u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl_ms } => {
                    store.set(key.clone(), value, Some(Duration::from_millis(ttl_ms)));
                    model.insert(key, (value, now + ttl_ms));
                }
                CacheOp::Get { key } => {
                    let expected = model
                        .get(&key)
                        .filter(|(_, expires_at)| now < *expires_at)
                        .map(|(value, _)| *value);
                    prop_assert_eq!(store.get(&key), expected);
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                    model.remove(&key);
                }
                CacheOp::Invalidate { resource } => {
                    let prefix = format!("{resource}:");
                    store.invalidate_by_prefix(&prefix);
                    model.retain(|k, _| !k.starts_with(&prefix));
                }
                CacheOp::Advance { ms } => {
                    clock.advance(Duration::from_millis(ms));
                    now += ms;
                }
                CacheOp::Sweep => {
                    store.cleanup_expired();
                    model.retain(|_, (_, expires_at)| now < *expires_at);
                }
            }
        }
    }

    // *For any* key set, invalidating one resource prefix removes exactly the
    // keys of that resource and leaves every other key untouched.
    #[test]
    fn prop_prefix_invalidation_is_exact(
        keys in prop::collection::hash_set(cache_key_strategy(), 1..40),
        target in resource_strategy()
    ) {
        let (mut store, _) = store_with_clock();
        for (i, key) in keys.iter().enumerate() {
            store.set(key.clone(), i as u32, None);
        }

        let prefix = format!("{target}:");
        let expected_removed = keys.iter().filter(|k| k.starts_with(&prefix)).count();
        prop_assert_eq!(store.invalidate_by_prefix(&prefix), expected_removed);

        let remaining: HashSet<String> = store.stats().keys.into_iter().collect();
        let expected: HashSet<String> =
            keys.into_iter().filter(|k| !k.starts_with(&prefix)).collect();
        prop_assert_eq!(remaining, expected);
    }

    // *For any* mix of live and expired entries, the sweep removes exactly the
    // expired ones.
    #[test]
    fn prop_sweep_removes_only_expired(
        ttls in prop::collection::vec(1u64..10_000, 1..40),
        elapsed in 0u64..10_000
    ) {
        let (mut store, clock) = store_with_clock();
        for (i, ttl_ms) in ttls.iter().enumerate() {
            store.set(format!("k:{i}"), i as u32, Some(Duration::from_millis(*ttl_ms)));
        }

        clock.advance(Duration::from_millis(elapsed));
        let expected_live = ttls.iter().filter(|ttl| elapsed < **ttl).count();

        prop_assert_eq!(store.cleanup_expired(), ttls.len() - expected_live);
        prop_assert_eq!(store.len(), expected_live);
    }

    // *For any* capacity and insert sequence, a capped store never holds more
    // than its capacity.
    #[test]
    fn prop_capacity_enforcement(
        capacity in 1usize..20,
        keys in prop::collection::vec(cache_key_strategy(), 1..60)
    ) {
        let (store, _) = store_with_clock();
        let mut store = store.with_capacity(capacity);

        for key in keys {
            store.set(key, 0, None);
            prop_assert!(store.len() <= capacity);
        }
    }

    // *For any* value, a second cache-aside call before expiry returns the
    // first fetcher's value without running the second fetcher.
    #[test]
    fn prop_cache_aside_returns_first_result(first in any::<u32>(), second in any::<u32>()) {
        let (store, _) = store_with_clock();
        let cache = SharedCache::new(store);

        tokio_test::block_on(async {
            let a = cache.cache_aside("x", || async move { Ok::<_, ()>(first) }, None).await;
            let b = cache
                .cache_aside("x", || async move { Ok::<_, ()>(second) }, None)
                .await;
            prop_assert_eq!(a, Ok(first));
            prop_assert_eq!(b, Ok(first));
            Ok(())
        })?;
    }
}

// == Concurrency ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    // *For any* set of concurrent cache-aside callers on one key, every caller
    // receives a value some fetcher produced and the cache ends up holding one
    // of them.
    #[test]
    fn prop_concurrent_cache_aside_is_consistent(values in prop::collection::vec(any::<u32>(), 2..16)) {
        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let (store, _) = store_with_clock();
            let cache = SharedCache::new(store);
            let produced: HashSet<u32> = values.iter().copied().collect();

            let mut handles = vec![];
            for value in values {
                let cache = cache.clone();
                handles.push(tokio::spawn(async move {
                    cache
                        .cache_aside("shared", || async move {
                            tokio::task::yield_now().await;
                            Ok::<_, ()>(value)
                        }, None)
                        .await
                }));
            }

            for handle in handles {
                let got = handle.await.expect("task should not panic");
                prop_assert!(matches!(got, Ok(v) if produced.contains(&v)));
            }

            let cached = cache.get("shared").await;
            prop_assert!(matches!(cached, Some(v) if produced.contains(&v)));
            Ok(())
        })?;
    }
}
