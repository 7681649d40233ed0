//! Popularity-gated caching.
//!
//! Objects are written to an [`ObjectCache`] only after they have been used
//! `min_uses` times. Use counts are tracked in a bounded
//! [`LruCache`](crate::cache::LruCache), so rarely used ids fall out of the
//! tracker instead of growing it without limit.

mod gate;
mod storage;

pub use gate::PopularityGate;
pub use storage::{MemoryObjectCache, ObjectCache, StoredObject};

/// An object with a comparable identifier.
pub trait Identified<I> {
    /// Value that uniquely identifies the object.
    fn id(&self) -> I;
}
