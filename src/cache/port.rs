//! Capability contract for key/value caches.

use std::fmt;
use std::hash::Hash;

use super::lru::{Lookup, LruCache};
use crate::types::errors::CacheResult;

/// A bounded in-process cache.
///
/// Implementations decide the storage and eviction policy; callers only rely
/// on this contract.
pub trait Cache<K, V>: Send + Sync {
    /// Reads a value. Counts as a use.
    fn get(&self, key: &K) -> CacheResult<Lookup<V>>;

    /// Stores a value, replacing any previous one.
    fn set(&self, key: K, value: V) -> CacheResult<()>;

    /// Removes a value. `Ok(false)` if it was absent.
    fn delete(&self, key: &K) -> CacheResult<bool>;

    /// Stored keys, most recently used first.
    fn keys(&self) -> Vec<K>;

    /// Number of stored keys.
    fn len(&self) -> usize;

    /// Whether nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of stored keys.
    fn capacity(&self) -> usize;
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> CacheResult<Lookup<V>> {
        LruCache::get(self, key)
    }

    fn set(&self, key: K, value: V) -> CacheResult<()> {
        LruCache::set(self, key, value)
    }

    fn delete(&self, key: &K) -> CacheResult<bool> {
        LruCache::delete(self, key)
    }

    fn keys(&self) -> Vec<K> {
        LruCache::keys(self)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }
}
