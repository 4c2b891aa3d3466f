use thiserror::Error;

/// Failures raised by the persistent tier.
///
/// These never escape [`CacheCoordinator`](crate::CacheCoordinator); they are
/// logged and the lookup degrades to a fresh fetch.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Storage I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt cache record {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, CacheError>;
