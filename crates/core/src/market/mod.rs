//! Market overview: major indices and a trending watchlist.

mod model;
mod service;

pub use model::{MarketIndex, MarketView, MARKET_INDICES, TRENDING_SYMBOLS};
pub use service::MarketService;
