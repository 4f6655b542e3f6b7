//! FIFO (first-in, first-out) bounded store
//!
//! Eviction follows insertion order only. Reads never reorder entries,
//! so a hot key is evicted as soon as it becomes the oldest one.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use ahash::RandomState;

/// Result of a [`FifoCache::put`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome<K> {
    /// Key was new and there was room for it
    Inserted,
    /// Key was new; the oldest entry was evicted to make room
    InsertedWithEviction(K),
    /// Key was already present; nothing changed
    AlreadyPresent,
}

/// Bounded map that evicts its earliest-inserted entry when full
pub struct FifoCache<K, V> {
    map: HashMap<K, V, RandomState>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K, V> FifoCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new FIFO cache with the given capacity
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");

        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Get a value from the cache
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    /// Check whether a key is resident
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert a key-value pair as the newest entry.
    ///
    /// A key that is already present keeps its original value and position.
    pub fn put(&mut self, key: K, value: V) -> PutOutcome<K> {
        if self.map.contains_key(&key) {
            return PutOutcome::AlreadyPresent;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        self.order.push_back(key.clone());
        self.map.insert(key, value);
        debug_assert!(self.map.len() <= self.capacity);
        debug_assert_eq!(self.map.len(), self.order.len());

        match evicted {
            Some(key) => PutOutcome::InsertedWithEviction(key),
            None => PutOutcome::Inserted,
        }
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from oldest to newest (the next eviction victim comes first)
    pub fn keys_oldest_first(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter()
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    fn evict(&mut self) -> Option<K> {
        let oldest = self.order.pop_front()?;
        self.map.remove(&oldest);
        Some(oldest)
    }
}
