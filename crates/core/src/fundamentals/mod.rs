//! Company overview and annual statements, cached for a day.

mod model;
mod service;

pub use model::Fundamentals;
pub use service::FundamentalsService;
