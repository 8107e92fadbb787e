//! Cache Store Module
//!
//! Main cache engine: a `HashMap` guarded by a single reader/writer lock,
//! with per-entry TTL and batched cleanup of expired entries.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats};
use crate::tasks::spawn_sweep_task;

// == TTL Cache ==
/// Thread-safe expiring key/value store.
///
/// Cloning is cheap and every clone shares the same storage, so one instance
/// is built at startup and handed to whoever needs it.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    stats: Arc<StatsCounters>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache with no background sweep attached.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(StatsCounters::default()),
        }
    }

    // == Set ==
    /// Inserts or overwrites `key`, expiring `ttl` from now.
    ///
    /// Overwriting replaces value and deadline together.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = CacheEntry::new(value, ttl);
        self.entries.write().await.insert(key.into(), entry);
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let removed = {
            let mut entries = self.entries.write().await;
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            before - entries.len()
        };

        self.stats.record_sweep(removed);
        removed
    }

    // == Length ==
    /// Returns the number of physically stored entries, expired ones included
    /// until the next sweep.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let total = self.len().await;
        self.stats.snapshot(total)
    }
}

impl<V: Clone> TtlCache<V> {
    // == Get ==
    /// Returns a copy of the value for `key` if present and not yet expired.
    ///
    /// Takes only the shared lock. Expired entries are left in place for the
    /// sweep to reclaim.
    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        let value = entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone());

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }
}

impl<V: Send + Sync + 'static> TtlCache<V> {
    // == Spawn ==
    /// Creates a cache and immediately starts its background sweep.
    ///
    /// The sweep runs every `sweep_interval` until `shutdown` is cancelled.
    pub fn spawn(
        sweep_interval: Duration,
        shutdown: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let cache = Self::new();
        let handle = spawn_sweep_task(cache.clone(), sweep_interval, shutdown);
        (cache, handle)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn test_store_new() {
        let cache: TtlCache<String> = TtlCache::new();
        assert_eq!(cache.len().await, 0);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_set_and_get() {
        let cache = TtlCache::new();

        cache.set("key1", "value1".to_string(), TTL).await;

        assert_eq!(cache.get("key1").await, Some("value1".to_string()));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_get_nonexistent() {
        let cache: TtlCache<String> = TtlCache::new();
        assert!(cache.get("nonexistent").await.is_none());
    }

    #[tokio::test]
    async fn test_store_overwrite() {
        let cache = TtlCache::new();

        cache.set("key1", "value1", TTL).await;
        cache.set("key1", "value2", TTL).await;

        assert_eq!(cache.get("key1").await, Some("value2"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_example_timeline() {
        let cache = TtlCache::new();
        cache.set("a", "v1", Duration::from_secs(1)).await;

        tokio::time::advance(Duration::from_millis(500)).await;
        assert_eq!(cache.get("a").await, Some("v1"));

        tokio::time::advance(Duration::from_millis(1000)).await;
        assert_eq!(cache.get("a").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_is_inclusive_at_ttl() {
        let cache = TtlCache::new();
        cache.set("k", 1, Duration::from_secs(2)).await;

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert_eq!(cache.get("k").await, Some(1));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_does_not_remove_expired() {
        let cache = TtlCache::new();
        cache.set("k", "v", Duration::from_secs(1)).await;

        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(cache.get("k").await.is_none());
        assert_eq!(cache.len().await, 1, "Lookup must not delete");
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_replaces_expiry() {
        let cache = TtlCache::new();

        // Long-lived old value, short-lived new value
        cache.set("k", "old", Duration::from_secs(100)).await;
        cache.set("k", "new", Duration::from_secs(1)).await;

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k").await, None, "Old deadline must not resurrect");

        // Short-lived old value, long-lived new value
        cache.set("j", "old", Duration::from_secs(1)).await;
        cache.set("j", "new", Duration::from_secs(100)).await;

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("j").await, Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_cleanup_expired() {
        let cache = TtlCache::new();

        cache.set("key1", "value1", Duration::from_secs(1)).await;
        cache.set("key2", "value2", Duration::from_secs(10)).await;

        tokio::time::advance(Duration::from_millis(1100)).await;

        let removed = cache.cleanup_expired().await;
        assert_eq!(removed, 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("key2").await, Some("value2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_with_max_ttl_is_readable() {
        let cache = TtlCache::new();

        cache.set("k", 1u8, Duration::MAX).await;
        cache.set("j", 2u8, Duration::from_secs(u64::MAX)).await;

        assert_eq!(cache.get("k").await, Some(1));
        tokio::time::advance(Duration::from_secs(3600)).await;
        assert_eq!(cache.get("j").await, Some(2));
        assert_eq!(cache.cleanup_expired().await, 0);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let cache = TtlCache::new();
        let other = cache.clone();

        cache.set("shared", 7u8, TTL).await;

        assert_eq!(other.get("shared").await, Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_stats() {
        let cache = TtlCache::new();

        cache.set("key1", "value1", Duration::from_secs(1)).await;
        cache.get("key1").await; // hit
        cache.get("nonexistent").await; // miss
        tokio::time::advance(Duration::from_secs(2)).await;
        cache.get("key1").await; // expired, miss
        cache.cleanup_expired().await;

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expired_removed, 1);
        assert_eq!(stats.sweeps, 1);
        assert_eq!(stats.total_entries, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_distinct_keys() {
        let cache = TtlCache::new();
        let writers = 64;

        let handles: Vec<_> = (0..writers)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    cache.set(format!("key{}", i), i, TTL).await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.expect("Writer should not panic");
        }

        assert_eq!(cache.len().await, writers);
        for i in 0..writers {
            assert_eq!(cache.get(&format!("key{}", i)).await, Some(i));
        }
    }
}
