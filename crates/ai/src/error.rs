//! AI insight error types.

use marketlens_market_data::DataError;
use thiserror::Error;

/// AI insight errors.
#[derive(Debug, Error)]
pub enum AiError {
    /// Invalid input or request.
    #[error("{0}")]
    InvalidInput(String),

    /// Missing API key for a provider.
    #[error("Missing API key for provider {0}")]
    MissingApiKey(String),

    /// Provider error (from rig-core or API).
    #[error("Provider error: {0}")]
    Provider(String),

    /// The analysis payload could not be serialized for fingerprinting.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AiError {
    /// Create a new invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new provider error.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}

/// Maps into the shared taxonomy at the HTTP boundary.
///
/// A missing key is a permanent 503; provider failures are retryable 502s.
impl From<AiError> for DataError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::InvalidInput(msg) => DataError::validation(msg),
            AiError::MissingApiKey(_) => {
                DataError::api("AI insights are not configured", 503, false)
            }
            AiError::Provider(_) => {
                DataError::api("Failed to generate stock insights", 502, true)
            }
            AiError::Serialization(e) => DataError::unknown(e.to_string()),
        }
    }
}
