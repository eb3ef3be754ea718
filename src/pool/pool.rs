//! Fixed-capacity object pool.
//!
//! All `size` instances are constructed up front; [`Pool::get`] and
//! [`Pool::put`] only move slot indices between the instances and a free
//! stack, so steady-state use never touches the allocator.
//!
//! # Slot tags and stale handles
//!
//! A checked-out instance records its slot through [`Poolable`]. Handles
//! also carry the slot's generation, which is bumped on every release. A
//! handle that outlived its checkout (double release, or release after the
//! slot was handed out again) therefore no longer matches and `put` ignores
//! it instead of corrupting the free stack.

/// Implemented by pooled types so the pool can tag checked-out instances.
pub trait Poolable {
    /// Slot this instance is checked out from, `None` while free.
    fn pool_slot(&self) -> Option<usize>;
    fn set_pool_slot(&mut self, slot: Option<usize>);
}

/// Checkout ticket returned by [`Pool::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    slot: u32,
    generation: u32,
}

impl PoolHandle {
    #[inline]
    #[must_use]
    pub fn slot(self) -> usize {
        self.slot as usize
    }

    #[inline]
    #[must_use]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
pub struct Pool<T> {
    items: Vec<T>,
    generations: Vec<u32>,
    free: Vec<usize>,
}

impl<T: Poolable> Pool<T> {
    /// Pre-constructs `size` instances with `factory(slot)`.
    pub fn new(size: usize, mut factory: impl FnMut(usize) -> T) -> Self {
        let mut items = Vec::with_capacity(size);
        for slot in 0..size {
            let mut item = factory(slot);
            item.set_pool_slot(None);
            items.push(item);
        }
        Self {
            items,
            generations: vec![0; size],
            // Reversed so the first checkout hands out slot 0.
            free: (0..size).rev().collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    /// Number of free instances.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Number of checked-out instances.
    #[inline]
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.items.len() - self.free.len()
    }

    /// Checks out a free instance; `None` when all are in use.
    pub fn get(&mut self) -> Option<PoolHandle> {
        let slot = self.free.pop()?;
        self.items[slot].set_pool_slot(Some(slot));
        Some(PoolHandle {
            slot: slot as u32,
            generation: self.generations[slot],
        })
    }

    fn is_current(&self, handle: PoolHandle) -> bool {
        let slot = handle.slot();
        slot < self.items.len()
            && self.generations[slot] == handle.generation
            && self.items[slot].pool_slot() == Some(slot)
    }

    /// Returns an instance to the pool.
    ///
    /// Yields the released instance so the caller can run its own release
    /// logic on it. A stale handle is a no-op and yields `None`.
    pub fn put(&mut self, handle: PoolHandle) -> Option<&mut T> {
        if !self.is_current(handle) {
            log::warn!(
                "Ignoring stale pool release (slot {}, generation {})",
                handle.slot,
                handle.generation
            );
            return None;
        }
        let slot = handle.slot();
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push(slot);
        let item = &mut self.items[slot];
        item.set_pool_slot(None);
        Some(item)
    }

    /// Checked-out instance behind `handle`.
    #[must_use]
    pub fn get_ref(&self, handle: PoolHandle) -> Option<&T> {
        self.is_current(handle).then(|| &self.items[handle.slot()])
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        if self.is_current(handle) {
            Some(&mut self.items[handle.slot()])
        } else {
            None
        }
    }

    /// Every instance, free or not, in slot order.
    pub fn iter_all(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Checked-out instances in slot order.
    pub fn iter_in_use(&self) -> impl Iterator<Item = &T> {
        self.items
            .iter()
            .enumerate()
            .filter(|(slot, item)| item.pool_slot() == Some(*slot))
            .map(|(_, item)| item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Slot {
        tag: Option<usize>,
        value: u32,
    }

    impl Poolable for Slot {
        fn pool_slot(&self) -> Option<usize> {
            self.tag
        }
        fn set_pool_slot(&mut self, slot: Option<usize>) {
            self.tag = slot;
        }
    }

    #[test]
    fn hands_out_slots_in_order() {
        let mut pool = Pool::new(3, |_| Slot::default());
        let a = pool.get().unwrap();
        let b = pool.get().unwrap();
        assert_eq!(a.slot(), 0);
        assert_eq!(b.slot(), 1);
        assert_eq!(pool.in_use(), 2);
    }

    #[test]
    fn exhaustion_returns_none() {
        let mut pool = Pool::new(2, |_| Slot::default());
        assert!(pool.get().is_some());
        assert!(pool.get().is_some());
        assert!(pool.get().is_none());
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn stale_handle_after_reacquire_is_ignored() {
        let mut pool = Pool::new(1, |_| Slot::default());
        let first = pool.get().unwrap();
        pool.get_mut(first).unwrap().value = 7;
        assert!(pool.put(first).is_some());

        let second = pool.get().unwrap();
        assert_eq!(first.slot(), second.slot());
        assert!(pool.put(first).is_none(), "old handle must not release the new checkout");
        assert_eq!(pool.in_use(), 1);
        assert_eq!(pool.get_ref(second).unwrap().value, 7);
    }
}
