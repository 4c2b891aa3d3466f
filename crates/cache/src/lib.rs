//! Two-tier cache for upstream market data.
//!
//! The crate provides:
//! - [`InMemoryCache`]: process-local, TTL-aware store with hit/miss/invalidation stats
//! - [`PersistentCache`]: durable tier writing one timestamped record per key
//! - [`CacheCoordinator`]: the get-or-compute facade composing both tiers
//!
//! # Lookup order
//!
//! ```text
//! get_cached_data(key, ttl, fetch)
//!        |
//!        v
//! +---------------+  hit   +--------------------+
//! | InMemoryCache | -----> | return value       |
//! +---------------+        +--------------------+
//!        | miss
//!        v
//! +-----------------+ fresh +---------------------------+
//! | PersistentCache | ----> | promote to memory, return |
//! +-----------------+       +---------------------------+
//!        | absent / stale / unreadable
//!        v
//! +---------------+        +----------------------------+
//! |    fetch()    | -----> | write both tiers, return   |
//! +---------------+        +----------------------------+
//! ```
//!
//! Persistent-tier failures never reach the caller. Errors from `fetch`
//! propagate unchanged.

pub mod clock;
pub mod coordinator;
pub mod entry;
pub mod error;
pub mod key;
pub mod memory;
pub mod persistent;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{CacheCoordinator, CacheReport, FileCacheStats};
pub use entry::CacheEntry;
pub use error::CacheError;
pub use key::{cache_key, ttl};
pub use memory::{CacheStats, InMemoryCache};
pub use persistent::{PersistedRecord, PersistentCache};
pub use storage::{FsStorage, Storage};
