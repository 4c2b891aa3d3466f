//! Quotes and the per-symbol dashboard snapshot.

mod model;
mod service;

pub use model::{QuoteFundamentals, StockData};
pub use service::StockService;
