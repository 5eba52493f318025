//! Index-aware binary min-heap.
//!
//! Items live in a flat array; a key -> slot map keeps arbitrary removal and
//! rescoring at O(log n). Equal scores have no guaranteed order: ties come out
//! in whatever order the sift operations leave them, so callers must not rely
//! on FIFO among equal scores.

use std::collections::HashMap;

use tracing::{trace, warn};

use super::HeapItem;

#[derive(Debug)]
pub struct MinHeap<T: HeapItem> {
    items: Vec<T>,
    slots: HashMap<T::Key, usize>,
}

impl<T: HeapItem> Default for MinHeap<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            slots: HashMap::new(),
        }
    }
}

impl<T: HeapItem> MinHeap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.slots.contains_key(key)
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.slots.get(key).map(|&slot| &self.items[slot])
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.slots.clear();
    }

    /// Iterates in heap-array order (not sorted).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Inserts `item`. Returns `false` and leaves the heap untouched if an item
    /// with the same key is already present.
    pub fn push(&mut self, item: T) -> bool {
        let key = item.key();
        if self.slots.contains_key(&key) {
            warn!(?key, "heap already holds this key, push ignored");
            return false;
        }
        let slot = self.items.len();
        self.items.push(item);
        self.slots.insert(key, slot);
        self.sift_up(slot);
        true
    }

    pub fn peek_min(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn pop_min(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.remove_slot(0))
    }

    /// Removes the item with `key` from anywhere in the heap.
    ///
    /// A missing key is logged and treated as a no-op.
    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        match self.slots.get(key).copied() {
            Some(slot) => Some(self.remove_slot(slot)),
            None => {
                warn!(?key, "heap does not hold this key, remove ignored");
                None
            }
        }
    }

    /// Mutates the item with `key` in place and restores heap order afterwards.
    ///
    /// This is the "rescored" operation: change the score inside `f`. Changing
    /// non-score fields is fine too, the re-sift is then a no-op.
    pub fn update<F>(&mut self, key: &T::Key, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let Some(slot) = self.slots.get(key).copied() else {
            warn!(?key, "heap does not hold this key, update ignored");
            return false;
        };
        f(&mut self.items[slot]);
        debug_assert!(self.items[slot].key() == *key, "heap key changed in update");
        self.resift(slot);
        true
    }

    fn remove_slot(&mut self, slot: usize) -> T {
        let item = self.items.swap_remove(slot);
        self.slots.remove(&item.key());
        if slot < self.items.len() {
            self.slots.insert(self.items[slot].key(), slot);
            self.resift(slot);
        }
        trace!(remaining = self.items.len(), "heap item removed");
        item
    }

    fn resift(&mut self, slot: usize) {
        if slot > 0 && self.less(slot, (slot - 1) / 2) {
            self.sift_up(slot);
        } else {
            self.sift_down(slot);
        }
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.less(slot, parent) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.items[a].score() < self.items[b].score()
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.slots.insert(self.items[a].key(), a);
        self.slots.insert(self.items[b].key(), b);
    }

    /// Checks parent <= child for every slot and that the key map is in sync.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let ordered = (1..self.items.len())
            .all(|slot| self.items[(slot - 1) / 2].score() <= self.items[slot].score());
        let indexed = self.slots.len() == self.items.len()
            && self
                .items
                .iter()
                .enumerate()
                .all(|(slot, item)| self.slots.get(&item.key()) == Some(&slot));
        ordered && indexed
    }
}
