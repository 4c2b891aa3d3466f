//! Error taxonomy for data acquisition.
//!
//! This module provides:
//! - [`DataError`]: the tagged error value every upstream call returns
//! - [`RetryClass`]: classification for determining retry behavior
//! - [`ErrorResponse`]: the client-facing rendering of an error
//! - [`log_error`]: structured logging at acquisition boundaries

mod retry;

pub use retry::RetryClass;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while acquiring market data.
///
/// Each variant is classified into a [`RetryClass`] via
/// [`retry_class`](Self::retry_class) and carries a stable tag via
/// [`error_type`](Self::error_type).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Malformed caller input, such as a bad ticker symbol.
    /// Rejected before any network activity; never retried.
    #[error("{0}")]
    Validation(String),

    /// The upstream answered with a specific failure.
    /// `retryable` is false for permanent states such as "symbol not found".
    #[error("{message}")]
    Api {
        message: String,
        status_code: u16,
        retryable: bool,
    },

    /// Transport-level failure: timeout, connection refused, reset.
    #[error("{0}")]
    Network(String),

    /// Anything not otherwise classified, such as an unparsable payload.
    #[error("{0}")]
    Unknown(String),
}

impl DataError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn api(message: impl Into<String>, status_code: u16, retryable: bool) -> Self {
        Self::Api {
            message: message.into(),
            status_code,
            retryable,
        }
    }

    /// A permanent 404 for `symbol`.
    pub fn not_found(symbol: &str) -> Self {
        Self::api(format!("No data available for symbol: {}", symbol), 404, false)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown(message.into())
    }

    /// Builds an [`DataError::Api`] for an HTTP status, retryable for 5xx,
    /// 408 and 429.
    pub fn from_status(status: reqwest::StatusCode, message: impl Into<String>) -> Self {
        let code = status.as_u16();
        let retryable = status.is_server_error()
            || status == reqwest::StatusCode::REQUEST_TIMEOUT
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS;
        Self::api(message, code, retryable)
    }

    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use marketlens_market_data::errors::{DataError, RetryClass};
    ///
    /// let error = DataError::network("connection reset");
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = DataError::not_found("ZZZZ");
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Validation(_) => RetryClass::Never,
            Self::Api { retryable, .. } => {
                if *retryable {
                    RetryClass::WithBackoff
                } else {
                    RetryClass::Never
                }
            }
            Self::Network(_) | Self::Unknown(_) => RetryClass::WithBackoff,
        }
    }

    /// Machine-readable tag used in client responses.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Api { .. } => "api_error",
            Self::Network(_) => "network_error",
            Self::Unknown(_) => "unknown_error",
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
            status_code: self.status_code(),
            error_type: self.error_type().to_string(),
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::network(format!("Request timed out: {}", err));
        }
        if let Some(status) = err.status() {
            return Self::from_status(status, err.to_string());
        }
        if err.is_decode() {
            return Self::unknown(format!("Failed to decode response: {}", err));
        }
        Self::network(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        Self::unknown(format!("Failed to parse response: {}", err))
    }
}

/// Client-facing rendering of an error. Never carries a backtrace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(rename = "type")]
    pub error_type: String,
}

impl ErrorResponse {
    /// Response for a failure that carries no usable detail.
    pub fn unknown() -> Self {
        Self {
            message: "An unknown error occurred".to_string(),
            status_code: None,
            error_type: "unknown_error".to_string(),
        }
    }
}

pub fn format_error_response(error: &DataError) -> ErrorResponse {
    error.to_response()
}

/// Emits one structured `{timestamp, error, context}` record at error level.
pub fn log_error(error: &DataError, context: serde_json::Value) {
    let record = serde_json::json!({
        "timestamp": Utc::now().to_rfc3339(),
        "error": error.to_response(),
        "context": context,
    });
    log::error!("{}", record);
}
