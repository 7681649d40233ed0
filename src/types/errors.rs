//! Error types for popcache.

use thiserror::Error;

/// Default result type for popcache.
pub type PopcacheResult<T> = Result<T, PopcacheError>;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Crate-level errors.
#[derive(Error, Debug)]
pub enum PopcacheError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Object '{0}' not found")]
    ObjectNotFound(String),
}

impl PopcacheError {
    /// Creates a configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }
}

/// Positional errors raised by [`KeySequence`](crate::sequence::KeySequence).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// Index outside `[0, len)` (or `[0, len]` for inserts).
    #[error("invalid index {index} for sequence of length {len}")]
    InvalidIndex { index: usize, len: usize },

    /// The sequence has no elements.
    #[error("zero length")]
    EmptyList,

    /// A link points nowhere or the chain disagrees with the recorded length.
    #[error("broken chain: {0}")]
    Corrupted(String),
}

/// Errors raised by [`LruCache`](crate::cache::LruCache).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The cache holds no entries.
    #[error("cache is empty")]
    EmptyCache,

    /// The value map and the recency ledger disagree.
    #[error("unexpected internal state: {0}")]
    UnexpectedInternalState(String),
}

impl CacheError {
    /// Wraps a ledger failure with the operation that hit it.
    pub fn internal<S: Into<String>>(context: S, source: SequenceError) -> Self {
        Self::UnexpectedInternalState(format!("{}: {}", context.into(), source))
    }
}
