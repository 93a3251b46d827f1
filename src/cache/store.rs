//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and a single
//! TTL applied to every entry.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{DescribeError, Result};

// == Cache Store ==
/// Bounded key to description store with LRU eviction and uniform TTL.
///
/// Both `get` hits and `add` count as a use for recency purposes.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    capacity: usize,
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, must be greater than zero
    /// * `ttl` - Freshness window for every entry; zero disables caching
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(DescribeError::invalid_argument(
                "cache capacity must be greater than zero",
            ));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity,
            ttl,
        })
    }

    // == Add ==
    /// Inserts or overwrites `key` with a freshly stamped entry.
    ///
    /// When the cache is full and `key` is new, the least recently used entry
    /// is evicted first.
    pub fn add(&mut self, key: String, value: String) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value for `key` if present and fresh.
    ///
    /// Stale entries are removed on read and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired(self.ttl) {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_miss();
            return None;
        }

        let value = entry.value.clone();
        self.lru.touch(key);
        self.stats.record_hit();
        Some(value)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Purge Expired ==
    /// Removes all stale entries and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let ttl = self.ttl;
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tokio::time::advance;

    const HOUR: Duration = Duration::from_secs(3600);

    fn store(capacity: usize) -> CacheStore {
        CacheStore::new(capacity, HOUR).unwrap()
    }

    #[test]
    fn test_store_new() {
        let store = store(100);
        assert!(store.is_empty());
        assert_eq!(store.capacity, 100);
        assert_eq!(store.ttl, HOUR);
    }

    #[test]
    fn test_store_rejects_zero_capacity() {
        let err = CacheStore::new(0, HOUR).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_store_add_and_get() {
        let mut store = store(100);

        store.add("Yoshua Bengio".to_string(), "Canadian computer scientist".to_string());

        assert_eq!(
            store.get("Yoshua Bengio").as_deref(),
            Some("Canadian computer scientist")
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(100);
        assert_eq!(store.get("nobody"), None);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store(100);

        store.add("key".to_string(), "value1".to_string());
        store.add("key".to_string(), "value2".to_string());

        assert_eq!(store.get("key").as_deref(), Some("value2"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(10, Duration::from_secs(60)).unwrap();
        store.add("key".to_string(), "value".to_string());

        advance(Duration::from_secs(59)).await;
        assert!(store.get("key").is_some());

        advance(Duration::from_secs(1)).await;
        assert_eq!(store.get("key"), None);
        // Stale entries are dropped on read
        assert!(store.is_empty());
        assert_eq!(store.stats().expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_overwrite_resets_freshness() {
        let mut store = CacheStore::new(10, Duration::from_secs(60)).unwrap();
        store.add("key".to_string(), "old".to_string());

        advance(Duration::from_secs(45)).await;
        store.add("key".to_string(), "new".to_string());

        advance(Duration::from_secs(45)).await;
        assert_eq!(store.get("key").as_deref(), Some("new"));
    }

    #[test]
    fn test_store_zero_ttl_never_hits() {
        let mut store = CacheStore::new(10, Duration::ZERO).unwrap();

        store.add("key".to_string(), "value".to_string());

        assert_eq!(store.get("key"), None);
        assert_eq!(store.stats().hits, 0);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = store(3);

        store.add("key1".to_string(), "value1".to_string());
        store.add("key2".to_string(), "value2".to_string());
        store.add("key3".to_string(), "value3".to_string());
        store.add("key4".to_string(), "value4".to_string());

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1"), None);
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
        assert!(store.get("key4").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = store(3);

        store.add("key1".to_string(), "value1".to_string());
        store.add("key2".to_string(), "value2".to_string());
        store.add("key3".to_string(), "value3".to_string());

        store.get("key1");
        store.add("key4".to_string(), "value4".to_string());

        assert!(store.get("key1").is_some());
        assert_eq!(store.get("key2"), None);
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = store(2);

        store.add("a".to_string(), "1".to_string());
        store.add("b".to_string(), "2".to_string());
        store.add("a".to_string(), "3".to_string());

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
        // "b" is now the least recently used
        store.add("c".to_string(), "4".to_string());
        assert_eq!(store.get("b"), None);
        assert_eq!(store.get("a").as_deref(), Some("3"));
    }

    #[test]
    fn test_store_stats() {
        let mut store = store(100);

        store.add("key1".to_string(), "value1".to_string());
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_purge_expired() {
        let mut store = CacheStore::new(100, Duration::from_secs(10)).unwrap();

        store.add("old".to_string(), "value".to_string());
        advance(Duration::from_secs(6)).await;
        store.add("recent".to_string(), "value".to_string());
        advance(Duration::from_secs(6)).await;

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("recent").is_some());
        assert_eq!(store.stats().expirations, 1);
    }
}
