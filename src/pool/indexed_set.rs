//! Unordered set with O(1) insert and remove.
//!
//! Elements live in a dense array. Each element's current array position is
//! recorded in a tag table keyed by the element's slot, so removal can find
//! the element without searching and fill the hole with the last element.

use crate::pool::pool::PoolHandle;

/// Elements addressable by a small dense integer (their tag slot).
pub trait SetKey: Copy + PartialEq {
    fn set_slot(&self) -> usize;
}

impl SetKey for usize {
    #[inline]
    fn set_slot(&self) -> usize {
        *self
    }
}

impl SetKey for PoolHandle {
    #[inline]
    fn set_slot(&self) -> usize {
        self.slot()
    }
}

#[derive(Debug, Clone)]
pub struct IndexedSet<K> {
    items: Vec<K>,
    positions: Vec<Option<usize>>,
}

impl<K: SetKey> Default for IndexedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SetKey> IndexedSet<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Pre-sizes storage for slots `0..capacity` so later inserts in that
    /// range never allocate.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            positions: vec![None; capacity],
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current array position of `item`, if present.
    #[must_use]
    pub fn position(&self, item: K) -> Option<usize> {
        let pos = (*self.positions.get(item.set_slot())?)?;
        (self.items.get(pos) == Some(&item)).then_some(pos)
    }

    #[must_use]
    pub fn contains(&self, item: K) -> bool {
        self.position(item).is_some()
    }

    /// Inserts `item`. Returns `false` (and changes nothing) if it is
    /// already present.
    pub fn add(&mut self, item: K) -> bool {
        if self.contains(item) {
            return false;
        }
        let slot = item.set_slot();
        if slot >= self.positions.len() {
            self.positions.resize(slot + 1, None);
        }
        self.positions[slot] = Some(self.items.len());
        self.items.push(item);
        true
    }

    /// Removes `item` by swapping the last element into its place.
    /// Returns `false` if it was not present.
    pub fn remove(&mut self, item: K) -> bool {
        let Some(pos) = self.position(item) else {
            return false;
        };
        self.items.swap_remove(pos);
        self.positions[item.set_slot()] = None;
        if let Some(&moved) = self.items.get(pos) {
            self.positions[moved.set_slot()] = Some(pos);
        }
        true
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[K] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        for item in &self.items {
            self.positions[item.set_slot()] = None;
        }
        self.items.clear();
    }
}
