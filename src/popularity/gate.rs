//! Popularity gate: persist objects only once they are used often enough.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use super::{Identified, ObjectCache};
use crate::cache::{Lookup, LruCache};
use crate::types::config::PopularityConfig;
use crate::{PopcacheError, PopcacheResult};

/// Counts uses per object id and saves an object to storage once its count
/// reaches `min_uses`.
///
/// Counts live in a bounded [`LruCache`], so ids that stop being used are
/// eventually forgotten and start again from zero. Only the number of uses
/// matters, not how often they happen.
///
/// Typical read path: try [`get`](Self::get); on a miss, load from the
/// primary store and report the use with
/// [`update_popularity`](Self::update_popularity).
pub struct PopularityGate<I, T, S> {
    uses: LruCache<I, u64>,
    storage: S,
    min_uses: u64,
    _object: PhantomData<fn() -> T>,
}

impl<I, T, S> PopularityGate<I, T, S>
where
    I: Eq + Hash + Clone + fmt::Debug + Send + Sync,
    T: Identified<I> + Send,
    S: ObjectCache<I, T>,
{
    /// Creates a gate.
    ///
    /// # Arguments
    /// - `min_uses`: use count at which an object gets saved
    /// - `tracker_capacity`: how many ids the use counter remembers
    /// - `storage`: where popular objects are saved
    pub fn new(min_uses: u64, tracker_capacity: usize, storage: S) -> Self {
        Self {
            uses: LruCache::new(tracker_capacity),
            storage,
            min_uses,
            _object: PhantomData,
        }
    }

    /// Creates a gate from configuration.
    pub fn from_config(config: &PopularityConfig, storage: S) -> Self {
        Self::new(config.min_uses, config.tracker_capacity, storage)
    }

    /// Adds `uses` to the object's count and saves it if the count reached
    /// the threshold.
    ///
    /// The object is saved again on every call past the threshold, since
    /// storage may have dropped it. Returns whether it was saved.
    pub async fn update_popularity(&self, object: T, uses: u64) -> PopcacheResult<bool> {
        let id = object.id();

        let count = match self.uses.get(&id)? {
            Lookup::Found(count) => count,
            Lookup::Absent => 0,
        };
        let count = count.saturating_add(uses);
        self.uses.set(id.clone(), count)?;

        if count < self.min_uses {
            tracing::debug!(id = ?id, count, min_uses = self.min_uses, "object not popular yet");
            return Ok(false);
        }

        self.save(object).await?;
        tracing::info!(id = ?id, count, "popular object saved");
        Ok(true)
    }

    /// Reads an object from storage.
    pub async fn get(&self, id: &I) -> PopcacheResult<Option<T>> {
        self.storage.get_by_id(id).await
    }

    /// Saves an object regardless of its use count.
    pub async fn force_save(&self, object: T) -> PopcacheResult<()> {
        self.save(object).await
    }

    async fn save(&self, object: T) -> PopcacheResult<()> {
        self.storage
            .save(object)
            .await
            .map_err(|e| PopcacheError::storage(format!("failed to save object: {}", e)))?;
        Ok(())
    }

    /// Use count at which objects get saved.
    pub fn min_uses(&self) -> u64 {
        self.min_uses
    }

    /// Current use count for `id`, without counting as a use.
    pub fn use_count(&self, id: &I) -> u64 {
        self.uses.peek(id).unwrap_or(0)
    }

    /// Tracked ids, most recently used first.
    pub fn tracked_ids(&self) -> Vec<I> {
        self.uses.keys()
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
