//! # popcache
//!
//! Bounded, thread-safe LRU cache backed by a linked recency ledger, plus a
//! popularity gate that persists objects once they are used often enough.
//!
//! ## Modules
//!
//! - [`sequence`] - Arena-backed ordered key sequence (the recency ledger)
//! - [`cache`] - Bounded LRU cache and the cache contract
//! - [`popularity`] - Popularity-gated caching over an object storage port
//! - [`cli`] - Command line interface
//! - [`types`] - Shared types (configuration, errors)

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod popularity;
pub mod sequence;
pub mod types;

pub use cache::{Cache, CacheStats, Lookup, LruCache};
pub use types::config::Config;
pub use types::errors::{CacheError, CacheResult, PopcacheError, PopcacheResult, SequenceError};
