//! Process-local TTL cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::entry::CacheEntry;

/// Snapshot of [`InMemoryCache`] counters.
///
/// Counters accumulate for the lifetime of the cache; `size` is the number of
/// entries held at snapshot time (expired-but-unswept entries included).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub size: usize,
    pub hit_rate: f64,
}

impl CacheStats {
    fn compute_hit_rate(hits: u64, misses: u64) -> f64 {
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

struct State<V> {
    entries: HashMap<String, CacheEntry<V>>,
    hits: u64,
    misses: u64,
    invalidations: u64,
}

/// TTL-aware key/value store with hit, miss and invalidation accounting.
///
/// Every operation is total. Expired entries are evicted lazily by [`get`](Self::get)
/// and in bulk by [`cleanup`](Self::cleanup); both count the eviction as an
/// invalidation.
pub struct InMemoryCache<V = serde_json::Value> {
    state: Mutex<State<V>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> InMemoryCache<V> {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State {
                entries: HashMap::new(),
                hits: 0,
                misses: 0,
                invalidations: 0,
            }),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<V>> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("InMemoryCache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut state = self.lock();

        match state.entries.get(key).map(|entry| entry.is_valid_at(now)) {
            None => {
                state.misses += 1;
                None
            }
            Some(false) => {
                state.entries.remove(key);
                state.invalidations += 1;
                state.misses += 1;
                debug!("Memory cache entry expired: {}", key);
                None
            }
            Some(true) => {
                state.hits += 1;
                state.entries.get(key).map(|entry| entry.data.clone())
            }
        }
    }

    /// Stores `value`, replacing any previous entry and restarting its lifetime.
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        let entry = CacheEntry::new(value, self.clock.now(), ttl);
        self.lock().entries.insert(key.to_string(), entry);
    }

    /// Removes `key`. Returns whether an entry existed.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut state = self.lock();
        if state.entries.remove(key).is_some() {
            state.invalidations += 1;
            true
        } else {
            false
        }
    }

    /// Drops every entry, counting each as an invalidation.
    pub fn clear(&self) {
        let mut state = self.lock();
        let removed = state.entries.len() as u64;
        state.entries.clear();
        state.invalidations += removed;
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            invalidations: state.invalidations,
            size: state.entries.len(),
            hit_rate: CacheStats::compute_hit_rate(state.hits, state.misses),
        }
    }

    /// Evicts every expired entry and returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|_, entry| entry.is_valid_at(now));
        let evicted = before - state.entries.len();
        state.invalidations += evicted as u64;
        evicted
    }
}

impl<V: Clone> Default for InMemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Duration as ChronoDuration;

    fn cache_with_clock() -> (InMemoryCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (InMemoryCache::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_get_missing_key_counts_misses() {
        let (cache, _) = cache_with_clock();
        for _ in 0..5 {
            assert_eq!(cache.get("never-set"), None);
        }
        let stats = cache.stats();
        assert_eq!(stats.misses, 5);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_hits_within_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", "v".to_string(), Duration::from_secs(10));
        for _ in 0..3 {
            clock.advance(ChronoDuration::seconds(1));
            assert_eq!(cache.get("k").as_deref(), Some("v"));
        }
        let stats = cache.stats();
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.hit_rate, 1.0);
    }

    #[test]
    fn test_ttl_boundary() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", "v".to_string(), Duration::from_millis(1000));

        clock.advance(ChronoDuration::milliseconds(999));
        assert!(cache.get("k").is_some());

        clock.advance(ChronoDuration::milliseconds(2));
        assert!(cache.get("k").is_none());
        // Expired entry was evicted on read.
        assert_eq!(cache.stats().size, 0);
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_set_overwrites_and_restamps() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", "old".to_string(), Duration::from_millis(100));
        clock.advance(ChronoDuration::milliseconds(90));
        cache.set("k", "new".to_string(), Duration::from_millis(100));
        clock.advance(ChronoDuration::milliseconds(90));
        assert_eq!(cache.get("k").as_deref(), Some("new"));
    }

    #[test]
    fn test_invalidate_counts_only_existing() {
        let (cache, _) = cache_with_clock();
        assert!(!cache.invalidate("missing"));
        assert_eq!(cache.stats().invalidations, 0);

        cache.set("k", "v".to_string(), Duration::from_secs(1));
        assert!(cache.invalidate("k"));
        assert_eq!(cache.stats().invalidations, 1);
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_clear_counts_removed_entries() {
        let (cache, _) = cache_with_clock();
        cache.set("a", "1".to_string(), Duration::from_secs(1));
        cache.set("b", "2".to_string(), Duration::from_secs(1));
        cache.clear();
        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.invalidations, 2);
    }

    #[test]
    fn test_cleanup_evicts_only_expired() {
        let (cache, clock) = cache_with_clock();
        cache.set("short", "1".to_string(), Duration::from_secs(1));
        cache.set("long", "2".to_string(), Duration::from_secs(60));
        clock.advance(ChronoDuration::seconds(2));

        assert_eq!(cache.cleanup(), 1);
        assert_eq!(cache.cleanup(), 0);
        assert_eq!(cache.stats().size, 1);
        assert_eq!(cache.get("long").as_deref(), Some("2"));
    }

    #[test]
    fn test_hit_rate_mixed() {
        let (cache, _) = cache_with_clock();
        cache.set("k", "v".to_string(), Duration::from_secs(1));
        cache.get("k");
        cache.get("missing");
        cache.get("k");
        cache.get("missing");
        assert_eq!(cache.stats().hit_rate, 0.5);
    }
}
