//! Error types for the cache
//!
//! Cache operations themselves never fail: missing, expired and invalid keys are
//! reported as `None`. These errors cover the surrounding setup only.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache setup.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration text could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Automatic pruning needs a tokio runtime to drive its timer
    #[error("No async runtime: {0}")]
    NoRuntime(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::InvalidConfig(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
