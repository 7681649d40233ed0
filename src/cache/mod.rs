//! Bounded LRU cache.
//!
//! [`LruCache`] pairs a value map with a [`KeySequence`](crate::sequence::KeySequence)
//! recency ledger under a single lock. [`Cache`] is the contract consumers
//! such as [`PopularityGate`](crate::popularity::PopularityGate) depend on.

mod lru;
mod port;

pub use lru::{CacheStats, Lookup, LruCache};
pub use port::Cache;
