//! Cache statistics tracking

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by every cache operation
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
    redundant_puts: AtomicU64,
}

impl CacheStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// A put for a key that was already resident
    pub(crate) fn record_redundant_put(&self) {
        self.redundant_puts.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get total misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get total evictions
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Copy all counters at once
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions(),
            redundant_puts: self.redundant_puts.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Lookups that found a resident entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// New entries stored
    pub inserts: u64,
    /// Entries dropped to make room
    pub evictions: u64,
    /// Puts ignored because the key was already resident
    pub redundant_puts: u64,
}

impl StatsSnapshot {
    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={} misses={} hit_ratio={:.1}% inserts={} evictions={} redundant_puts={}",
            self.hits,
            self.misses,
            self.hit_ratio() * 100.0,
            self.inserts,
            self.evictions,
            self.redundant_puts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_basic() {
        let stats = CacheStats::new();

        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        let snap = stats.snapshot();
        assert_eq!(snap.hits, 2);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.hit_ratio(), 2.0 / 3.0);
    }

    #[test]
    fn test_empty_ratio() {
        assert_eq!(StatsSnapshot::default().hit_ratio(), 0.0);
    }

    #[test]
    fn test_snapshot_display() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_insert();
        stats.record_eviction();
        stats.record_redundant_put();

        assert_eq!(
            stats.snapshot().to_string(),
            "hits=1 misses=1 hit_ratio=50.0% inserts=1 evictions=1 redundant_puts=1"
        );
    }
}
