//! Multi-source company news.
//!
//! ```text
//! NewsService::get_company_news(symbol)
//!        |
//!   CacheCoordinator ("news_<symbol>", 1h)
//!        |  miss
//!        v
//!  primary source ---+
//!                    +--> merge_news --> enrich_all --> Vec<NewsItem>
//!  secondary source -+
//! ```
//!
//! Each source is retried on its own and degrades to "no items" when it gives
//! up. Enrichment never removes an item.

mod enrich;
mod merge;
mod service;

pub use enrich::{enrich_all, enrich_item, ENRICH_CONCURRENCY};
pub use merge::merge_news;
pub use service::NewsService;
