//! Reorder buffer for results that finish out of order.

use std::collections::BTreeMap;

/// Releases items strictly in index order, holding back any that arrive
/// ahead of a gap.
#[derive(Debug)]
pub struct OrderedMerge<T> {
    next: usize,
    pending: BTreeMap<usize, T>,
}

impl<T> OrderedMerge<T> {
    /// Create a buffer expecting index 0 first.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a buffer expecting `first` first.
    pub fn starting_at(first: usize) -> Self {
        Self {
            next: first,
            pending: BTreeMap::new(),
        }
    }

    /// Accept an item and return every item now releasable, in order.
    ///
    /// An index already released or already pending is ignored.
    pub fn push(&mut self, index: usize, item: T) -> Vec<T> {
        if index < self.next || self.pending.contains_key(&index) {
            log::debug!("Ignoring duplicate result for slot {}", index);
            return Vec::new();
        }
        self.pending.insert(index, item);

        let mut ready = Vec::new();
        while let Some(item) = self.pending.remove(&self.next) {
            ready.push(item);
            self.next += 1;
        }
        ready
    }

    /// Index of the next item to release.
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Number of items held back.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Check whether nothing is held back.
    pub fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for OrderedMerge<T> {
    fn default() -> Self {
        Self::new()
    }
}
