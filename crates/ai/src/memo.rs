//! Per-symbol memo of the last analysis and the payload fingerprint it was
//! computed from.
//!
//! There is no TTL: an entry is replaced as soon as a different fingerprint
//! is seen for its symbol. Growth across symbols is bounded by LRU eviction.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use log::warn;
use lru::LruCache;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::analysis::StructuredAnalysis;
use crate::error::AiError;

pub const DEFAULT_CAPACITY: usize = 256;

/// Content fingerprint of `payload`: hex SHA-256 over its JSON encoding.
pub fn fingerprint<T: Serialize>(payload: &T) -> Result<String, AiError> {
    let bytes = serde_json::to_vec(payload)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisCacheEntry {
    pub content_hash: String,
    pub result: StructuredAnalysis,
}

pub struct AnalysisCache {
    entries: Mutex<LruCache<String, AnalysisCacheEntry>>,
}

impl AnalysisCache {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, AnalysisCacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("AnalysisCache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// The remembered result for `symbol`, if it was computed from `content_hash`.
    pub fn lookup(&self, symbol: &str, content_hash: &str) -> Option<StructuredAnalysis> {
        let mut entries = self.lock();
        entries
            .get(symbol)
            .filter(|entry| entry.content_hash == content_hash)
            .map(|entry| entry.result.clone())
    }

    /// Replaces whatever was remembered for `symbol`.
    pub fn store(&self, symbol: &str, content_hash: String, result: StructuredAnalysis) {
        self.lock().put(
            symbol.to_string(),
            AnalysisCacheEntry {
                content_hash,
                result,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
