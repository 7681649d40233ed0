//! Ordered key sequence used as the cache's recency ledger.
//!
//! A singly-linked chain of keys stored in an arena. Positions are plain
//! indices counted from the head; every positional operation walks the
//! chain, so they are O(n) except for front/back access.

mod list;

pub use list::{Iter, KeySequence};
