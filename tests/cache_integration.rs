//! Integration tests for the LRU cache.

use std::sync::Arc;
use std::thread;

use popcache::cache::{Cache, Lookup, LruCache};
use popcache::sequence::KeySequence;
use popcache::{CacheError, SequenceError};

/// Deterministic pseudo-random stream for operation mixes.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

/// Reference recency list: front is most recent.
fn touch(model: &mut Vec<u64>, key: u64) {
    model.retain(|k| *k != key);
    model.insert(0, key);
}

#[test]
fn test_matches_reference_model() {
    let capacity = 6;
    let cache = LruCache::new(capacity);
    let mut model: Vec<u64> = Vec::new();
    let mut rng = Lcg(42);

    for step in 0..2_000 {
        let key = rng.next() % 12;
        match rng.next() % 4 {
            0 | 1 => {
                cache.set(key, key * 10).unwrap();
                touch(&mut model, key);
                model.truncate(capacity);
            }
            2 => {
                let found = cache.get(&key).unwrap();
                if model.contains(&key) {
                    assert_eq!(found, Lookup::Found(key * 10), "step {}", step);
                    touch(&mut model, key);
                } else {
                    assert_eq!(found, Lookup::Absent, "step {}", step);
                }
            }
            _ => {
                let removed = cache.delete(&key).unwrap();
                assert_eq!(removed, model.contains(&key), "step {}", step);
                model.retain(|k| *k != key);
            }
        }

        assert_eq!(cache.keys(), model, "step {}", step);
    }
    cache.check_consistency().unwrap();
}

#[test]
fn test_len_is_min_of_distinct_and_capacity() {
    let cache = LruCache::new(5);
    for i in 0..20u32 {
        cache.set(i, ()).unwrap();
        assert_eq!(cache.len(), (i as usize + 1).min(5));
    }
}

#[test]
fn test_concrete_scenarios() {
    let cache = LruCache::new(2);
    cache.set("a", 1).unwrap();
    cache.set("b", 2).unwrap();
    cache.get(&"a").unwrap();
    assert_eq!(cache.keys(), vec!["a", "b"]);
    cache.set("c", 3).unwrap();
    assert_eq!(cache.keys(), vec!["c", "a"]);
    assert_eq!(cache.get(&"b").unwrap(), Lookup::Absent);

    let cache = LruCache::new(4);
    cache.set("k1", 1).unwrap();
    cache.set("k2", 2).unwrap();
    cache.set("k3", 3).unwrap();
    cache.set("k1", 100).unwrap();
    assert_eq!(cache.get(&"k1").unwrap(), Lookup::Found(100));
    cache.set("k4", 1).unwrap();
    assert_eq!(cache.get(&"k1").unwrap(), Lookup::Found(100));
    cache.set("k5", 5).unwrap();
    assert_eq!(cache.get(&"k2").unwrap(), Lookup::Absent);
}

#[test]
fn test_sequence_errors() {
    let mut list: KeySequence<u8> = KeySequence::new();
    assert_eq!(list.get_at(0), Err(SequenceError::EmptyList));
    assert_eq!(list.remove_at(0), Err(SequenceError::EmptyList));

    list.insert_last(1).unwrap();
    assert_eq!(
        list.get_at(1),
        Err(SequenceError::InvalidIndex { index: 1, len: 1 })
    );
    assert_eq!(
        list.remove_at(1),
        Err(SequenceError::InvalidIndex { index: 1, len: 1 })
    );
}

#[test]
fn test_empty_cache_ends() {
    let cache: LruCache<u8, u8> = LruCache::new(1);
    assert_eq!(cache.most_recent_key(), Err(CacheError::EmptyCache));
    assert_eq!(cache.least_recent_key(), Err(CacheError::EmptyCache));
}

#[test]
fn test_concurrent_access_keeps_invariants() {
    let cache = Arc::new(LruCache::new(16));
    let mut handles = Vec::new();

    for worker in 0..8u64 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            let mut rng = Lcg(worker + 1);
            for _ in 0..1_000 {
                let key = rng.next() % 32;
                match rng.next() % 3 {
                    0 => cache.set(key, worker).unwrap(),
                    1 => {
                        cache.get(&key).unwrap();
                    }
                    _ => {
                        cache.delete(&key).unwrap();
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 16);
    cache.check_consistency().unwrap();
}

#[test]
fn test_shared_through_contract() {
    let cache: Arc<dyn Cache<String, u32>> = Arc::new(LruCache::new(2));

    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..100 {
                cache.set(format!("key-{}", i % 3), i).unwrap();
            }
        })
    };
    writer.join().unwrap();

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.capacity(), 2);
    assert_eq!(cache.keys(), vec!["key-0".to_string(), "key-2".to_string()]);
}
