//! Error types surfaced by the acquisition services.
//!
//! Services speak the upstream taxonomy directly so the retry executor and the
//! HTTP boundary classify failures the same way.

pub use marketlens_market_data::errors::{log_error, DataError, ErrorResponse, RetryClass};

/// Type alias for Result using the shared taxonomy.
pub type Result<T> = std::result::Result<T, DataError>;
