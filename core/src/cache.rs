//! Time-expiring key/value store backing the last-run lookups.
//!
//! Entries never refresh themselves: a `get` past the expiry window still
//! returns the entry (callers decide whether a stale value is usable), and
//! only `put` stamps a new timestamp. Freshness is measured with
//! `tokio::time::Instant` so tests under a paused runtime control the clock.

use std::collections::HashMap;
use std::hash::Hash;

use tokio::time::{Duration, Instant};

/// A cached value plus the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub data: V,
    pub inserted: Instant,
}

/// Plain in-memory cache with a fixed expiry window. No interior locking;
/// owners that share it across tasks wrap it in a `Mutex`.
#[derive(Debug)]
pub struct TimedCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    expiry: Duration,
}

impl<K: Eq + Hash, V> TimedCache<K, V> {
    pub fn new(expiry: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            expiry,
        }
    }

    /// Returns the entry for `key`, fresh or not.
    pub fn get(&self, key: &K) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// Stores `data` under `key` with a fresh timestamp, replacing any prior
    /// entry.
    pub fn put(&mut self, key: K, data: V) {
        self.entries.insert(
            key,
            CacheEntry {
                data,
                inserted: Instant::now(),
            },
        );
    }

    /// Removes one entry.
    pub fn invalidate(&mut self, key: &K) {
        self.entries.remove(key);
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether `entry` is still inside the expiry window.
    pub fn is_fresh(&self, entry: &CacheEntry<V>) -> bool {
        entry.inserted.elapsed() < self.expiry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    const EXPIRY: Duration = Duration::from_millis(60_000);

    #[tokio::test(start_paused = true)]
    async fn get_returns_stored_value_while_fresh() {
        let mut cache: TimedCache<i64, &str> = TimedCache::new(EXPIRY);
        cache.put(42, "ok");

        let entry = cache.get(&42).unwrap();
        assert_eq!(entry.data, "ok");
        assert!(cache.is_fresh(entry));

        // Just inside the window.
        advance(EXPIRY - Duration::from_millis(1)).await;
        let entry = cache.get(&42).unwrap();
        assert!(cache.is_fresh(entry));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entry_is_retrievable_but_not_fresh() {
        let mut cache: TimedCache<i64, &str> = TimedCache::new(EXPIRY);
        cache.put(7, "old");

        advance(EXPIRY).await;
        let entry = cache.get(&7).unwrap();
        assert_eq!(entry.data, "old");
        assert!(!cache.is_fresh(entry));
    }

    #[tokio::test(start_paused = true)]
    async fn put_replaces_entry_and_refreshes_timestamp() {
        let mut cache: TimedCache<i64, &str> = TimedCache::new(EXPIRY);
        cache.put(1, "first");
        advance(EXPIRY).await;
        cache.put(1, "second");

        let entry = cache.get(&1).unwrap();
        assert_eq!(entry.data, "second");
        assert!(cache.is_fresh(entry));
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_removes_single_key() {
        let mut cache: TimedCache<i64, &str> = TimedCache::new(EXPIRY);
        cache.put(1, "a");
        cache.put(2, "b");

        cache.invalidate(&1);
        assert!(cache.get(&1).is_none());
        assert_eq!(cache.get(&2).unwrap().data, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn clear_removes_everything() {
        let mut cache: TimedCache<i64, &str> = TimedCache::new(EXPIRY);
        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&1).is_none());
        assert!(cache.get(&2).is_none());
        assert!(cache.get(&3).is_none());
    }
}
