//! Node operations used by the B-tree balancing algorithms.
//!
//! These extend [`Node`] with ordered insertion, displacement of entries and
//! children, and lookups by key or child id. They are plain array
//! operations: every populated entry sits in a contiguous prefix of the
//! entry slots, and every populated child in a contiguous prefix of the
//! child slots.

use crate::multiway::{Entry, Node, NodeId};

impl<K: Ord, V> Node<K, V> {
    /// Insert `entry` at its sorted position, shifting later entries right.
    ///
    /// Returns the slot the entry landed in. The last entry slot must be
    /// free; on a full node this is only called on an over-capacity scratch
    /// copy.
    pub(crate) fn insert_ordered(&mut self, entry: Entry<K, V>) -> usize {
        let index = self.first_index_with_greater_key(&entry.key);
        self.displace_to_right(index);
        self.set_entry(index, Some(entry));
        index
    }

    /// Open an empty entry slot at `index` by shifting the tail right.
    pub(crate) fn displace_to_right(&mut self, index: usize) {
        let slots = self.entry_slots_mut();
        debug_assert!(slots.last().is_some_and(Option::is_none), "no free entry slot");
        slots[index..].rotate_right(1);
    }

    /// Remove entry `index`, shifting the tail left to close the gap.
    pub(crate) fn displace_to_left(&mut self, index: usize) -> Option<Entry<K, V>> {
        let entry = self.take_entry(index);
        self.entry_slots_mut()[index..].rotate_left(1);
        entry
    }

    /// Open an empty child slot at `index` by shifting the tail right.
    pub(crate) fn displace_children_right(&mut self, index: usize) {
        let slots = self.child_slots_mut();
        debug_assert!(slots.last().is_some_and(Option::is_none), "no free child slot");
        slots[index..].rotate_right(1);
    }

    /// Remove child `index`, shifting the tail left to close the gap.
    pub(crate) fn displace_children_left(&mut self, index: usize) -> Option<NodeId> {
        let child = self.take_child(index);
        self.child_slots_mut()[index..].rotate_left(1);
        child
    }

    /// Append an entry after the last populated one.
    pub(crate) fn push_entry(&mut self, entry: Entry<K, V>) {
        let count = self.count_entries();
        self.set_entry(count, Some(entry));
    }

    /// Remove and return the last populated entry.
    pub(crate) fn pop_entry(&mut self) -> Option<Entry<K, V>> {
        let count = self.count_entries();
        self.take_entry(count.checked_sub(1)?)
    }

    /// Insert `child` at slot `index`, shifting later children right.
    pub(crate) fn insert_child(&mut self, index: usize, child: NodeId) {
        self.displace_children_right(index);
        self.set_child(index, Some(child));
    }

    /// Move every entry and child into a node built for `degree`.
    ///
    /// Used to widen a node into an over-capacity scratch copy (`degree + 1`)
    /// and to narrow it back once it fits. Populated slots must fit.
    pub(crate) fn resized(mut self, degree: usize) -> Self {
        let mut node = Self::new(degree);
        for i in 0..self.count_entries() {
            node.set_entry(i, self.take_entry(i));
        }
        for i in 0..self.count_children() {
            node.set_child(i, self.take_child(i));
        }
        node
    }

    /// Take every populated entry and child out of the node, in order.
    pub(crate) fn into_parts(mut self) -> (Vec<Entry<K, V>>, Vec<NodeId>) {
        let entries = (0..self.entry_capacity())
            .filter_map(|i| self.take_entry(i))
            .collect();
        let children = (0..self.degree())
            .filter_map(|i| self.take_child(i))
            .collect();
        (entries, children)
    }

    /// Slot of the entry whose key equals `key`.
    pub(crate) fn index_of_entry(&self, key: &K) -> Option<usize> {
        self.entries().position(|entry| entry.key == *key)
    }

    /// Slot holding the child reference `child`.
    pub(crate) fn index_of_child(&self, child: NodeId) -> Option<usize> {
        self.children().position(|id| id == child)
    }

    /// First slot whose entry key is greater than `key`, or the number of
    /// entries if none is.
    ///
    /// This is both where `key` would be inserted and which child subtree
    /// would contain it.
    pub(crate) fn first_index_with_greater_key(&self, key: &K) -> usize {
        self.entries()
            .position(|entry| entry.key > *key)
            .unwrap_or_else(|| self.count_entries())
    }
}
