//! Durable cache tier: one JSON record per key.

use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};
use crate::storage::Storage;

const RECORD_EXTENSION: &str = ".json";

/// On-disk record format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    /// Write time in epoch milliseconds.
    pub timestamp: i64,
    pub data: serde_json::Value,
}

/// Best-effort durable store keyed by cache key.
///
/// `read`, `write` and `remove` never fail: errors are logged and reported as
/// absence or no-op. Use [`try_read`](Self::try_read) to observe the raw error.
#[derive(Clone)]
pub struct PersistentCache {
    storage: Arc<dyn Storage>,
}

impl PersistentCache {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Record name for `key`. Percent-encoding keeps distinct keys distinct
    /// and free of path separators.
    pub fn record_name(key: &str) -> String {
        format!("{}{}", urlencoding::encode(key), RECORD_EXTENSION)
    }

    pub async fn try_read(&self, key: &str) -> Result<Option<PersistedRecord>> {
        let Some(bytes) = self.storage.read(&Self::record_name(key)).await? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| CacheError::Serialization {
                key: key.to_string(),
                source,
            })
    }

    pub async fn read(&self, key: &str) -> Option<PersistedRecord> {
        match self.try_read(key).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Persistent cache read failed, treating as miss: {}", e);
                None
            }
        }
    }

    /// Returns whether the record was stored.
    pub async fn write(&self, key: &str, record: &PersistedRecord) -> bool {
        let bytes = match serde_json::to_vec(record) {
            Ok(bytes) => bytes,
            Err(source) => {
                warn!(
                    "Persistent cache write skipped: {}",
                    CacheError::Serialization {
                        key: key.to_string(),
                        source,
                    }
                );
                return false;
            }
        };
        match self.storage.write(&Self::record_name(key), &bytes).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Persistent cache write failed: {}", e);
                false
            }
        }
    }

    pub async fn remove(&self, key: &str) -> bool {
        match self.storage.remove(&Self::record_name(key)).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!("Persistent cache remove failed: {}", e);
                false
            }
        }
    }

    /// Number of stored records; 0 if the medium cannot be listed.
    pub async fn count(&self) -> usize {
        match self.storage.list().await {
            Ok(names) => names
                .iter()
                .filter(|name| name.ends_with(RECORD_EXTENSION))
                .count(),
            Err(e) => {
                warn!("Persistent cache listing failed: {}", e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FsStorage;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_record_name_encodes_separators() {
        assert_eq!(PersistentCache::record_name("quote_aapl"), "quote_aapl.json");
        assert_eq!(PersistentCache::record_name("a/b"), "a%2Fb.json");
        assert_ne!(
            PersistentCache::record_name("a/b"),
            PersistentCache::record_name("a_b")
        );
    }

    #[tokio::test]
    async fn test_round_trip_and_count() {
        let dir = tempdir().unwrap();
        let storage = FsStorage::open(dir.path()).await.unwrap();
        let cache = PersistentCache::new(Arc::new(storage));

        let record = PersistedRecord {
            timestamp: 1_700_000_000_000,
            data: json!({"price": 191.5}),
        };
        assert!(cache.write("quote_aapl", &record).await);
        assert_eq!(cache.read("quote_aapl").await, Some(record));
        assert_eq!(cache.count().await, 1);

        assert!(cache.remove("quote_aapl").await);
        assert_eq!(cache.read("quote_aapl").await, None);
        assert_eq!(cache.count().await, 0);
    }

    #[tokio::test]
    async fn test_corrupt_record_reads_as_absent() {
        let dir = tempdir().unwrap();
        let storage = FsStorage::open(dir.path()).await.unwrap();
        storage.write("bad.json", b"not json").await.unwrap();
        let cache = PersistentCache::new(Arc::new(storage));

        assert!(matches!(
            cache.try_read("bad").await,
            Err(CacheError::Serialization { .. })
        ));
        assert_eq!(cache.read("bad").await, None);
    }

    #[test]
    fn test_record_wire_format() {
        let record: PersistedRecord =
            serde_json::from_str(r#"{"timestamp": 1717243200000, "data": [1, 2]}"#).unwrap();
        assert_eq!(record.timestamp, 1_717_243_200_000);
        assert_eq!(record.data, json!([1, 2]));
    }
}
