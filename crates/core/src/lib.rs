//! Marketlens Core - data acquisition services.
//!
//! Every service composes the shared [`CacheCoordinator`](marketlens_cache::CacheCoordinator),
//! the retry executor and an upstream provider:
//!
//! ```text
//! request --> Service --> CacheCoordinator.get_cached_data(key, ttl, fetch)
//!                               |  hit: memory, then persistent tier
//!                               |  miss
//!                               v
//!                         with_retry(provider call) --> both tiers --> caller
//! ```
//!
//! - **stock** - Quotes and the per-symbol dashboard snapshot
//! - **fundamentals** - Company overview and annual statements
//! - **news** - Two-source aggregation, title dedup and enrichment
//! - **market** - Index levels and the trending watchlist

pub mod errors;
pub mod fundamentals;
pub mod market;
pub mod news;
pub mod stock;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{DataError, Result};
pub use fundamentals::{Fundamentals, FundamentalsService};
pub use market::{MarketIndex, MarketService, MarketView};
pub use news::{merge_news, NewsService};
pub use stock::{QuoteFundamentals, StockData, StockService};
