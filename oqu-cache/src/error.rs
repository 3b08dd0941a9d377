//! Error types for cache operations
//!
//! Every variant here describes a degraded cache, never a failed request:
//! the store logs these and falls back to "absent" on read and "no-op" on
//! write.

use thiserror::Error;

/// Main error type for cache and storage operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backing storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Blob is larger than the storage surface accepts
    #[error("Storage quota exceeded: {needed} bytes requested, quota is {quota} bytes")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Filesystem error from a file-backed storage surface
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored blob or entry could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CacheError {
    /// Whether the stored blob itself is unreadable, as opposed to the
    /// storage surface being unavailable
    pub fn is_corrupt_blob(&self) -> bool {
        matches!(self, CacheError::Serialization(_))
    }
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
