//! The get-or-compute facade over both cache tiers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clock::Clock;
use crate::entry::is_fresh;
use crate::memory::{CacheStats, InMemoryCache};
use crate::persistent::{PersistedRecord, PersistentCache};

/// Persistent-tier part of [`CacheReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileCacheStats {
    pub size: usize,
}

/// Combined statistics for both tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheReport {
    pub memory_cache: CacheStats,
    pub file_cache: FileCacheStats,
}

/// Owns the lifecycle of every cached value.
///
/// Created once per process and shared behind an `Arc`. Concurrent misses on
/// the same key each fetch independently; the persistent tier keeps whichever
/// write lands last.
pub struct CacheCoordinator {
    memory: Arc<InMemoryCache>,
    persistent: PersistentCache,
    clock: Arc<dyn Clock>,
}

impl CacheCoordinator {
    pub fn new(memory: Arc<InMemoryCache>, persistent: PersistentCache, clock: Arc<dyn Clock>) -> Self {
        Self {
            memory,
            persistent,
            clock,
        }
    }

    pub fn memory(&self) -> &Arc<InMemoryCache> {
        &self.memory
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its result.
    ///
    /// Errors from `fetch` are returned as-is. Cache-layer failures are logged
    /// and turn into a fetch.
    pub async fn get_cached_data<T, E, F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.memory.get(key) {
            match serde_json::from_value::<T>(value) {
                Ok(data) => {
                    debug!("Memory cache hit: {}", key);
                    return Ok(data);
                }
                Err(e) => warn!("Memory cache entry {} has unexpected shape: {}", key, e),
            }
        }

        if let Some(data) = self.read_persistent(key, ttl).await {
            return Ok(data);
        }

        debug!("Cache miss, fetching: {}", key);
        let data = fetch().await?;
        self.store(key, &data, ttl).await;
        Ok(data)
    }

    async fn read_persistent<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        let record = self.persistent.read(key).await?;
        let Some(written_at) = Utc.timestamp_millis_opt(record.timestamp).single() else {
            warn!("Persistent cache record {} has invalid timestamp {}", key, record.timestamp);
            return None;
        };
        if !is_fresh(written_at, ttl, self.clock.now()) {
            debug!("Persistent cache entry stale: {}", key);
            return None;
        }
        match serde_json::from_value::<T>(record.data.clone()) {
            Ok(data) => {
                debug!("Persistent cache hit, promoting: {}", key);
                self.memory.set(key, record.data, ttl);
                Some(data)
            }
            Err(e) => {
                warn!("Persistent cache entry {} has unexpected shape: {}", key, e);
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) {
        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                warn!("Fetched value for {} is not cacheable: {}", key, e);
                return;
            }
        };
        let record = PersistedRecord {
            timestamp: self.clock.now().timestamp_millis(),
            data: value.clone(),
        };
        self.memory.set(key, value, ttl);
        self.persistent.write(key, &record).await;
    }

    /// Removes `key` from both tiers.
    pub async fn invalidate_cache(&self, key: &str) {
        self.memory.invalidate(key);
        self.persistent.remove(key).await;
    }

    pub async fn get_cache_stats(&self) -> CacheReport {
        CacheReport {
            memory_cache: self.memory.stats(),
            file_cache: FileCacheStats {
                size: self.persistent.count().await,
            },
        }
    }
}
