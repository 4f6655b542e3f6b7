//! ContentCache: bounded FIFO cache shared by every loader

use parking_lot::RwLock;
use tracing::debug;

use crate::content::{ContentHandle, ResourceKey};
use crate::error::{Error, Result};
use crate::fifo::{FifoCache, PutOutcome};
use crate::stats::CacheStats;

/// Default number of resident entries
pub const DEFAULT_CAPACITY: usize = 50;

/// Thread-safe bounded cache of resolved content
///
/// Construct one per application and share it (usually behind an `Arc`)
/// with every loader. Lookups take a read lock and never reorder entries;
/// inserts take the write lock, so the capacity check, eviction and insert
/// happen as one step.
pub struct ContentCache {
    entries: RwLock<FifoCache<ResourceKey, ContentHandle>>,
    stats: CacheStats,
}

impl ContentCache {
    /// Create a cache holding up to [`DEFAULT_CAPACITY`] entries
    pub fn new() -> Self {
        Self::from_store(FifoCache::new(DEFAULT_CAPACITY))
    }

    /// Create a cache with the given capacity
    ///
    /// # Errors
    /// * `Error::ZeroCapacity` - `capacity` is 0
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Ok(Self::from_store(FifoCache::new(capacity)))
    }

    fn from_store(store: FifoCache<ResourceKey, ContentHandle>) -> Self {
        Self {
            entries: RwLock::new(store),
            stats: CacheStats::new(),
        }
    }

    /// Look up resolved content
    pub fn get(&self, key: &ResourceKey) -> Option<ContentHandle> {
        let found = self.entries.read().get(key).cloned();
        match found {
            Some(_) => {
                self.stats.record_hit();
                debug!(%key, "cache hit");
            }
            None => {
                self.stats.record_miss();
                debug!(%key, "cache miss");
            }
        }
        found
    }

    /// Store resolved content and return the handle now resident for `key`
    ///
    /// If `key` is already cached the existing handle wins and is returned;
    /// `content` is dropped.
    pub fn put(&self, key: ResourceKey, content: ContentHandle) -> ContentHandle {
        let mut entries = self.entries.write();
        let outcome = entries.put(key.clone(), content.clone());
        match outcome {
            PutOutcome::Inserted => {
                self.stats.record_insert();
                content
            }
            PutOutcome::InsertedWithEviction(evicted) => {
                self.stats.record_insert();
                self.stats.record_eviction();
                debug!(%key, %evicted, "cache full, evicted oldest entry");
                content
            }
            PutOutcome::AlreadyPresent => {
                self.stats.record_redundant_put();
                entries.get(&key).cloned().unwrap_or(content)
            }
        }
    }

    /// Whether `key` is resident (does not count as a hit or miss)
    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.entries.read().contains(key)
    }

    /// Resident keys from oldest to newest
    pub fn keys(&self) -> Vec<ResourceKey> {
        self.entries.read().keys_oldest_first().cloned().collect()
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.entries.read().capacity()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Drop every entry (statistics are kept)
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn handle(n: usize) -> ContentHandle {
        ContentHandle::new(format!("content {n}").into_bytes())
    }

    fn path_key(n: usize) -> ResourceKey {
        ResourceKey::from(format!("/p/{n}"))
    }

    #[test]
    fn test_cache_basic() {
        let cache = ContentCache::new();
        let key = ResourceKey::from("/img/a.jpg");

        assert_eq!(cache.get(&key), None);
        cache.put(key.clone(), handle(1));

        assert_eq!(cache.get(&key), Some(handle(1)));
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 1);
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            ContentCache::with_capacity(0),
            Err(Error::ZeroCapacity)
        ));
    }

    #[test]
    fn test_fifty_one_inserts_evict_first() {
        let cache = ContentCache::new();
        for n in 1..=50 {
            cache.put(path_key(n), handle(n));
        }
        assert_eq!(cache.len(), 50);

        cache.put(path_key(51), handle(51));

        assert_eq!(cache.len(), 50);
        assert_eq!(cache.get(&path_key(1)), None);
        assert_eq!(cache.get(&path_key(2)), Some(handle(2)));
        for n in 2..=51 {
            assert!(cache.contains(&path_key(n)));
        }
        assert_eq!(cache.stats().evictions(), 1);
    }

    #[test]
    fn test_reads_never_promote() {
        let cache = ContentCache::new();
        for n in 1..=50 {
            cache.put(path_key(n), handle(n));
        }
        for _ in 0..20 {
            assert!(cache.get(&path_key(1)).is_some());
        }

        cache.put(path_key(51), handle(51));

        assert!(!cache.contains(&path_key(1)));
        assert_eq!(cache.keys().first(), Some(&path_key(2)));
    }

    #[test]
    fn test_second_put_returns_resident_handle() {
        let cache = ContentCache::new();
        let key = ResourceKey::from("/img/a.jpg");

        let first = cache.put(key.clone(), handle(1));
        let second = cache.put(key.clone(), handle(2));

        assert_eq!(first, handle(1));
        assert_eq!(second, handle(1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().snapshot().redundant_puts, 1);
    }

    #[test]
    fn test_concurrent_puts_respect_capacity() {
        let cache = Arc::new(ContentCache::with_capacity(16).unwrap());

        let workers: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for n in 0..200 {
                        cache.put(path_key(t * 1000 + n), handle(n));
                        assert!(cache.len() <= 16);
                        cache.get(&path_key(t * 1000 + n / 2));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(cache.len(), 16);
        assert_eq!(cache.keys().len(), 16);
        let snap = cache.stats().snapshot();
        assert_eq!(snap.inserts, 8 * 200);
        assert_eq!(snap.evictions, 8 * 200 - 16);
    }

    #[test]
    fn test_clear_keeps_stats() {
        let cache = ContentCache::new();
        cache.put(path_key(1), handle(1));
        cache.get(&path_key(1));

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits(), 1);
    }
}
