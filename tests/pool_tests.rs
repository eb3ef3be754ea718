//! Pool & IndexedSet Tests
//!
//! Tests for:
//! - Pool conservation under arbitrary get/put sequences
//! - Stale and double release
//! - IndexedSet tag consistency against a reference set

use std::collections::BTreeSet;

use canopy::pool::{IndexedSet, Pool, PoolHandle, Poolable};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

#[derive(Debug, Default)]
struct Token {
    slot: Option<usize>,
}

impl Poolable for Token {
    fn pool_slot(&self) -> Option<usize> {
        self.slot
    }

    fn set_pool_slot(&mut self, slot: Option<usize>) {
        self.slot = slot;
    }
}

// ============================================================================
// Pool
// ============================================================================

#[test]
fn pool_conserves_instances() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut pool = Pool::new(16, |_| Token::default());
    let mut out: Vec<PoolHandle> = Vec::new();

    for _ in 0..2_000 {
        if rng.random_range(0..3) > 0 {
            if let Some(handle) = pool.get() {
                assert!(!out.contains(&handle));
                out.push(handle);
            } else {
                assert_eq!(out.len(), pool.capacity());
            }
        } else if !out.is_empty() {
            let index = rng.random_range(0..out.len());
            let handle = out.swap_remove(index);
            assert!(pool.put(handle).is_some());
        }
        assert_eq!(pool.available() + pool.in_use(), pool.capacity());
        assert_eq!(pool.in_use(), out.len());
    }
}

#[test]
fn pool_double_release_is_noop() {
    let mut pool = Pool::new(2, |_| Token::default());
    let handle = pool.get().unwrap();

    assert!(pool.put(handle).is_some());
    assert!(pool.put(handle).is_none());
    assert_eq!(pool.available(), 2);

    // The free stack was not corrupted: exactly two checkouts succeed.
    let a = pool.get().unwrap();
    let b = pool.get().unwrap();
    assert_ne!(a.slot(), b.slot());
    assert!(pool.get().is_none());
}

#[test]
fn pool_tags_checked_out_instances() {
    let mut pool = Pool::new(3, |_| Token::default());
    let handle = pool.get().unwrap();

    assert_eq!(pool.get_ref(handle).unwrap().pool_slot(), Some(handle.slot()));
    assert_eq!(pool.iter_in_use().count(), 1);

    pool.put(handle);
    assert!(pool.get_ref(handle).is_none());
    assert!(pool.iter_all().all(|t| t.pool_slot().is_none()));
}

#[test]
fn empty_pool_is_always_exhausted() {
    let mut pool: Pool<Token> = Pool::new(0, |_| Token::default());
    assert!(pool.get().is_none());
    assert_eq!(pool.capacity(), 0);
}

// ============================================================================
// IndexedSet
// ============================================================================

#[test]
fn indexed_set_matches_reference() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut set = IndexedSet::with_capacity(32);
    let mut reference = BTreeSet::new();

    for _ in 0..5_000 {
        let value: usize = rng.random_range(0..32);
        if rng.random_range(0..2) == 0 {
            assert_eq!(set.add(value), reference.insert(value));
        } else {
            assert_eq!(set.remove(value), reference.remove(&value));
        }

        assert_eq!(set.len(), reference.len());
        for (index, &item) in set.as_slice().iter().enumerate() {
            assert_eq!(set.position(item), Some(index));
        }
    }

    let contents: BTreeSet<usize> = set.iter().copied().collect();
    assert_eq!(contents, reference);
}

#[test]
fn indexed_set_grows_past_initial_capacity() {
    let mut set = IndexedSet::with_capacity(2);
    assert!(set.add(10usize));
    assert!(set.contains(10));
    assert!(set.remove(10));
    assert!(set.is_empty());
}

#[test]
fn indexed_set_clear_resets_tags() {
    let mut set = IndexedSet::with_capacity(4);
    set.add(1usize);
    set.add(3usize);
    set.clear();

    assert!(set.is_empty());
    assert!(!set.contains(1));
    assert!(set.add(3));
    assert_eq!(set.position(3), Some(0));
}

#[test]
fn indexed_set_of_pool_handles_ignores_stale_generation() {
    let mut pool = Pool::new(1, |_| Token::default());
    let old = pool.get().unwrap();
    pool.put(old);
    let fresh = pool.get().unwrap();

    let mut set = IndexedSet::new();
    set.add(fresh);
    assert!(!set.contains(old));
    assert!(!set.remove(old));
    assert!(set.contains(fresh));
}
