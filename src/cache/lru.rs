//! Bounded LRU cache over a linked recency ledger.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use crate::sequence::KeySequence;
use crate::types::config::CacheConfig;
use crate::types::errors::{CacheError, CacheResult, SequenceError};

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    /// The key was present.
    Found(V),
    /// The key was not cached. Not an error.
    Absent,
}

impl<V> Lookup<V> {
    /// Whether the key was present.
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Converts into an `Option`.
    pub fn into_option(self) -> Option<V> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent => None,
        }
    }
}

impl<V> From<Lookup<V>> for Option<V> {
    fn from(lookup: Lookup<V>) -> Self {
        lookup.into_option()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Current number of entries.
    pub size: usize,

    /// Maximum capacity.
    pub capacity: usize,

    /// Number of cache hits.
    pub hits: u64,

    /// Number of cache misses.
    pub misses: u64,

    /// Number of entries dropped for exceeding capacity.
    pub evictions: u64,
}

impl CacheStats {
    /// Computes the hit rate.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Value map and recency ledger, always locked together.
struct CacheInner<K, V> {
    values: HashMap<K, V>,
    ledger: KeySequence<K>,
}

/// Fixed-capacity LRU cache.
///
/// Keeps values in a map and their recency in a [`KeySequence`] (front is the
/// most recently used key). Both live behind one mutex: `get` reorders the
/// ledger, so reads need the same exclusivity as writes.
///
/// Positions are looked up by linear scan on every access instead of keeping
/// a key→node index, trading O(n) per call for a single structure to keep
/// consistent.
pub struct LruCache<K, V> {
    inner: Mutex<CacheInner<K, V>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Creates an empty cache.
    ///
    /// A capacity of zero is legal: every `set` evicts what it just inserted.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                values: HashMap::with_capacity(capacity),
                ledger: KeySequence::with_capacity(capacity),
            }),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Creates a cache sized from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Looks up `key` and marks it as most recently used.
    pub fn get(&self, key: &K) -> CacheResult<Lookup<V>>
    where
        V: Clone,
    {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let Some(value) = inner.values.get(key).cloned() else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(?key, "LRU cache miss");
            return Ok(Lookup::Absent);
        };

        let index = inner
            .ledger
            .index_of(key)
            .map_err(|e| CacheError::internal("locating read key", e))?
            .ok_or_else(|| {
                CacheError::UnexpectedInternalState(format!(
                    "key {:?} is stored in values but missing from the ledger",
                    key
                ))
            })?;
        inner
            .ledger
            .move_to_first(index)
            .map_err(|e| CacheError::internal("moving read key to front", e))?;

        self.hits.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(?key, from = index, "LRU cache hit");
        Ok(Lookup::Found(value))
    }

    /// Reads `key` without touching recency or counters.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().values.get(key).cloned()
    }

    /// Whether `key` is cached. Does not touch recency.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().values.contains_key(key)
    }

    /// Stores `value` under `key` as the most recently used entry.
    ///
    /// Evicts the least recently used key when this pushes the cache over
    /// capacity. At most one key is evicted per call.
    pub fn set(&self, key: K, value: V) -> CacheResult<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let position = match inner.ledger.index_of(&key) {
            Ok(position) => position,
            Err(SequenceError::EmptyList) => None,
            Err(e) => return Err(CacheError::internal("locating written key", e)),
        };
        if position.is_some() != inner.values.contains_key(&key) {
            return Err(CacheError::UnexpectedInternalState(format!(
                "written key {:?} is tracked by only one of values and ledger",
                key
            )));
        }
        if let Some(index) = position {
            inner
                .ledger
                .remove_at(index)
                .map_err(|e| CacheError::internal("removing previous entry of written key", e))?;
        }

        inner
            .ledger
            .insert_first(key.clone())
            .map_err(|e| CacheError::internal("inserting written key", e))?;
        inner.values.insert(key, value);

        if inner.ledger.len() > self.capacity {
            let evicted = inner
                .ledger
                .remove_last()
                .map_err(|e| CacheError::internal("evicting least recently used key", e))?;
            if inner.values.remove(&evicted).is_none() {
                return Err(CacheError::UnexpectedInternalState(format!(
                    "evicted key {:?} had no value",
                    evicted
                )));
            }
            self.evictions.fetch_add(1, Ordering::Relaxed);

            tracing::debug!(
                key = ?evicted,
                length = inner.ledger.len(),
                capacity = self.capacity,
                "cache overflow, evicted a value"
            );
        }

        Ok(())
    }

    /// Removes `key`. Returns `false` if it was not cached.
    pub fn delete(&self, key: &K) -> CacheResult<bool> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if !inner.values.contains_key(key) {
            return Ok(false);
        }

        let index = inner
            .ledger
            .index_of(key)
            .map_err(|e| CacheError::internal("locating deleted key", e))?
            .ok_or_else(|| {
                CacheError::UnexpectedInternalState(format!(
                    "deleted key {:?} was missing from the ledger",
                    key
                ))
            })?;
        inner
            .ledger
            .remove_at(index)
            .map_err(|e| CacheError::internal("removing deleted key", e))?;
        inner.values.remove(key);

        Ok(true)
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.values.clear();
        inner.ledger.clear();
    }

    /// Live keys, most recently used first.
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().ledger.to_vec()
    }

    /// Most recently used key.
    pub fn most_recent_key(&self) -> CacheResult<K> {
        let inner = self.inner.lock();
        inner.ledger.get_first().cloned().map_err(empty_or_internal)
    }

    /// Least recently used key, the next one to be evicted.
    pub fn least_recent_key(&self) -> CacheResult<K> {
        let inner = self.inner.lock();
        inner.ledger.get_last().cloned().map_err(empty_or_internal)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().ledger.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Verifies that the value map and the ledger hold the same keys and
    /// that the ledger's links are intact.
    pub fn check_consistency(&self) -> CacheResult<()> {
        let inner = self.inner.lock();

        inner
            .ledger
            .check_links()
            .map_err(|e| CacheError::internal("walking ledger", e))?;

        if inner.values.len() != inner.ledger.len() {
            return Err(CacheError::UnexpectedInternalState(format!(
                "{} values but {} ledger keys",
                inner.values.len(),
                inner.ledger.len()
            )));
        }
        if let Some(stray) = inner.ledger.iter().find(|k| !inner.values.contains_key(*k)) {
            return Err(CacheError::UnexpectedInternalState(format!(
                "ledger key {:?} has no value",
                stray
            )));
        }
        if inner.ledger.len() > self.capacity {
            return Err(CacheError::UnexpectedInternalState(format!(
                "{} entries exceed capacity {}",
                inner.ledger.len(),
                self.capacity
            )));
        }
        Ok(())
    }
}

fn empty_or_internal(err: SequenceError) -> CacheError {
    match err {
        SequenceError::EmptyList => CacheError::EmptyCache,
        other => CacheError::internal("reading ledger end", other),
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("keys", &inner.ledger)
            .finish()
    }
}
