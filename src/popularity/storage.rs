//! Object storage port and its in-memory adapter.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::Identified;
use crate::{PopcacheError, PopcacheResult};

/// Where popular objects end up.
///
/// Implement this for your own backend (a key/value server, a database
/// table). [`PopularityGate`](super::PopularityGate) writes here once an
/// object has been seen often enough.
#[async_trait]
pub trait ObjectCache<I: Send + Sync, T: Send>: Send + Sync {
    /// Fetches an object by id. `Ok(None)` if it is not stored.
    async fn get_by_id(&self, id: &I) -> PopcacheResult<Option<T>>;

    /// Stores an object under its own id, replacing any previous copy.
    async fn save(&self, object: T) -> PopcacheResult<T>;

    /// Deletes an object. Fails with [`PopcacheError::ObjectNotFound`] if it
    /// is not stored.
    async fn delete(&self, id: &I) -> PopcacheResult<()>;
}

/// Object kept by [`MemoryObjectCache`].
#[derive(Debug, Clone)]
pub struct StoredObject<T> {
    /// The stored object.
    pub object: T,

    /// When it was last saved.
    pub saved_at: DateTime<Utc>,
}

impl<T> StoredObject<T> {
    /// Wraps an object saved now.
    pub fn new(object: T) -> Self {
        Self {
            object,
            saved_at: Utc::now(),
        }
    }
}

/// Unbounded in-process [`ObjectCache`].
pub struct MemoryObjectCache<I, T> {
    objects: RwLock<HashMap<I, StoredObject<T>>>,
}

impl<I, T> MemoryObjectCache<I, T>
where
    I: Eq + Hash,
{
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// When the object with `id` was last saved.
    pub async fn saved_at(&self, id: &I) -> Option<DateTime<Utc>> {
        self.objects.read().await.get(id).map(|stored| stored.saved_at)
    }
}

impl<I, T> Default for MemoryObjectCache<I, T>
where
    I: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<I, T> ObjectCache<I, T> for MemoryObjectCache<I, T>
where
    I: Eq + Hash + fmt::Debug + Send + Sync,
    T: Identified<I> + Clone + Send + Sync,
{
    async fn get_by_id(&self, id: &I) -> PopcacheResult<Option<T>> {
        let objects = self.objects.read().await;
        Ok(objects.get(id).map(|stored| stored.object.clone()))
    }

    async fn save(&self, object: T) -> PopcacheResult<T> {
        let id = object.id();
        self.objects
            .write()
            .await
            .insert(id, StoredObject::new(object.clone()));
        Ok(object)
    }

    async fn delete(&self, id: &I) -> PopcacheResult<()> {
        match self.objects.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(PopcacheError::ObjectNotFound(format!("{:?}", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: String,
        body: String,
    }

    impl Identified<String> for Note {
        fn id(&self) -> String {
            self.id.clone()
        }
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: id.to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let store: MemoryObjectCache<String, Note> = MemoryObjectCache::new();
        store.save(note("n1", "hello")).await.unwrap();

        let found = store.get_by_id(&"n1".to_string()).await.unwrap();
        assert_eq!(found, Some(note("n1", "hello")));
        assert!(store.saved_at(&"n1".to_string()).await.is_some());
    }

    #[tokio::test]
    async fn test_save_replaces() {
        let store: MemoryObjectCache<String, Note> = MemoryObjectCache::new();
        store.save(note("n1", "first")).await.unwrap();
        store.save(note("n1", "second")).await.unwrap();

        assert_eq!(store.len().await, 1);
        let found = store.get_by_id(&"n1".to_string()).await.unwrap();
        assert_eq!(found.unwrap().body, "second");
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store: MemoryObjectCache<String, Note> = MemoryObjectCache::new();
        assert_eq!(store.get_by_id(&"nope".to_string()).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete() {
        let store: MemoryObjectCache<String, Note> = MemoryObjectCache::new();
        store.save(note("n1", "hello")).await.unwrap();

        store.delete(&"n1".to_string()).await.unwrap();
        let err = store.delete(&"n1".to_string()).await.unwrap_err();
        assert!(matches!(err, PopcacheError::ObjectNotFound(_)));
    }
}
