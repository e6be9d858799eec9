//! Per-word lookup cache with LRU eviction
//!
//! The lock is never held across an await: callers check the cache, do the
//! lookup unlocked, then store the result.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

/// Default number of words kept per cached tier
pub const DEFAULT_CAPACITY: usize = 256;

/// Bounded word-keyed cache
pub struct LookupCache<V> {
    entries: Mutex<LruCache<String, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> LookupCache<V> {
    pub fn new(capacity: usize) -> Self {
        let size = NonZeroUsize::new(capacity)
            .unwrap_or(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap());
        Self {
            entries: Mutex::new(LruCache::new(size)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached value for a word, refreshing its recency
    pub fn get(&self, word: &str) -> Option<V> {
        let value = self.entries.lock().get(word).cloned();
        match value {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        value
    }

    pub fn put(&self, word: &str, value: V) {
        self.entries.lock().put(word.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        CacheStats {
            used: entries.len(),
            capacity: entries.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub used: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss_counting() {
        let cache: LookupCache<Option<String>> = LookupCache::new(4);
        assert_eq!(cache.get("hund"), None);

        cache.put("hund", Some("dog".into()));
        cache.put("xyzzy", None);
        assert_eq!(cache.get("hund"), Some(Some("dog".into())));
        // a cached negative result is still a hit
        assert_eq!(cache.get("xyzzy"), Some(None));

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.used, 2);
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let cache: LookupCache<u32> = LookupCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.get("a"), Some(1));
        cache.put("c", 3);

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        let cache: LookupCache<u32> = LookupCache::new(0);
        assert_eq!(cache.stats().capacity, DEFAULT_CAPACITY);
    }
}
