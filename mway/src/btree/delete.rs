//! B-tree deletion with underflow recovery.
//!
//! Entries are only ever removed from leaves: deleting from an internal
//! node swaps in the in-order predecessor, which lives in the rightmost leaf
//! of the left subtree. A leaf that drops below `min_keys` entries is
//! repaired by, in order of preference:
//!
//! 1. borrowing from its right sibling through the parent,
//! 2. borrowing from its left sibling through the parent,
//! 3. merging with a sibling and the separator between them.
//!
//! A merge takes an entry out of the parent, so the parent is checked next.
//! When the root ends up with no entries its only child becomes the new root.

use crate::btree::tree::BTree;
use crate::multiway::{NodeId, TreeError};

impl<K: Ord, V> BTree<K, V> {
    /// Remove `key` and return its value.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if the key is absent. Nothing is
    /// modified in that case.
    pub fn delete(&mut self, key: &K) -> Result<V, TreeError> {
        let mut ancestors = Vec::new();
        let mut id = self.tree.root.ok_or(TreeError::KeyNotFound)?;
        let index = loop {
            let node = self.tree.nodes.get(id);
            if let Some(index) = node.index_of_entry(key) {
                break index;
            }
            let child = node
                .child(node.first_index_with_greater_key(key))
                .ok_or(TreeError::KeyNotFound)?;
            ancestors.push(id);
            id = child;
        };

        // Walk to the predecessor leaf: child `index` first, then always the
        // last child. A leaf holder is its own predecessor leaf.
        let mut leaf = id;
        let mut slot = index;
        while let Some(child) = self.tree.nodes.get(leaf).child(slot) {
            ancestors.push(leaf);
            leaf = child;
            slot = self.tree.nodes.get(leaf).count_entries();
        }

        let removed = if leaf == id {
            self.tree.nodes.get_mut(id).displace_to_left(index)
        } else {
            let predecessor = self.tree.nodes.get_mut(leaf).pop_entry();
            self.tree.nodes.get_mut(id).set_entry(index, predecessor)
        };
        let Some(removed) = removed else {
            unreachable!("entry {index} of node {id} vanished during delete");
        };

        self.tree.len -= 1;
        self.rebalance(leaf, ancestors);
        Ok(removed.value)
    }

    /// Repair underflow starting at `id` and cascading through `ancestors`.
    fn rebalance(&mut self, mut id: NodeId, mut ancestors: Vec<NodeId>) {
        let min_keys = self.limits.min_keys;
        loop {
            let count = self.tree.nodes.get(id).count_entries();
            let Some(parent) = ancestors.pop() else {
                if count == 0 {
                    let new_root = self.tree.nodes.free(id).child(0);
                    self.tree.root = new_root;
                    tracing::trace!(old_root = %id, "collapsed root");
                }
                return;
            };
            if count >= min_keys {
                return;
            }

            let parent_node = self.tree.nodes.get(parent);
            let Some(pos) = parent_node.index_of_child(id) else {
                unreachable!("node {id} is missing from its parent {parent}");
            };
            let left = pos.checked_sub(1).and_then(|i| parent_node.child(i));
            let right = if pos < parent_node.count_entries() {
                parent_node.child(pos + 1)
            } else {
                None
            };

            if let Some(right) = right {
                if self.tree.nodes.get(right).count_entries() > min_keys {
                    self.borrow_from_right(id, parent, pos, right);
                    return;
                }
            }
            if let Some(left) = left {
                if self.tree.nodes.get(left).count_entries() > min_keys {
                    self.borrow_from_left(id, parent, pos, left);
                    return;
                }
            }

            match (left, right) {
                (_, Some(right)) => self.merge(parent, pos, id, right),
                (Some(left), None) => self.merge(parent, pos - 1, left, id),
                (None, None) => unreachable!("node {id} has no siblings"),
            }
            id = parent;
        }
    }

    /// Rotate the right sibling's first entry up into the parent and the
    /// separator down into `id`.
    fn borrow_from_right(&mut self, id: NodeId, parent: NodeId, pos: usize, right: NodeId) {
        let right_node = self.tree.nodes.get_mut(right);
        let promoted = right_node.displace_to_left(0);
        let moved_child = right_node.displace_children_left(0);

        let separator = self.tree.nodes.get_mut(parent).set_entry(pos, promoted);
        let node = self.tree.nodes.get_mut(id);
        node.set_entry(node.count_entries(), separator);

        if let Some(child) = moved_child {
            self.adopt(id, child);
        }
        tracing::trace!(node = %id, sibling = %right, "borrowed from right sibling");
    }

    /// Rotate the left sibling's last entry up into the parent and the
    /// separator down into `id`.
    fn borrow_from_left(&mut self, id: NodeId, parent: NodeId, pos: usize, left: NodeId) {
        let left_node = self.tree.nodes.get_mut(left);
        let count = left_node.count_entries();
        let lent = left_node.take_entry(count - 1);
        let moved_child = left_node.take_child(count);

        let separator = self.tree.nodes.get_mut(parent).set_entry(pos - 1, lent);
        let node = self.tree.nodes.get_mut(id);
        node.displace_to_right(0);
        node.set_entry(0, separator);

        if let Some(child) = moved_child {
            self.adopt(id, child);
        }
        tracing::trace!(node = %id, sibling = %left, "borrowed from left sibling");
    }

    /// Fold separator `sep` of `parent` and all of `right` into `left`, then
    /// drop `right` from the parent and free it.
    fn merge(&mut self, parent: NodeId, sep: usize, left: NodeId, right: NodeId) {
        let (entries, children) = self.tree.nodes.free(right).into_parts();

        let parent_node = self.tree.nodes.get_mut(parent);
        let separator = parent_node.displace_to_left(sep);
        let detached = parent_node.displace_children_left(sep + 1);
        debug_assert_eq!(detached, Some(right));

        let node = self.tree.nodes.get_mut(left);
        node.set_entry(node.count_entries(), separator);
        for entry in entries {
            node.push_entry(entry);
        }
        for child in children {
            self.adopt(left, child);
        }
        tracing::trace!(node = %left, freed = %right, "merged siblings");
    }

    /// Insert `child` into `id` at the slot its smallest key belongs to.
    fn adopt(&mut self, id: NodeId, child: NodeId) {
        let node = self.tree.nodes.get(id);
        let slot = self
            .tree
            .nodes
            .get(child)
            .entry(0)
            .map_or_else(|| node.count_children(), |first| node.first_index_with_greater_key(&first.key));
        self.tree.nodes.get_mut(id).insert_child(slot, child);
    }
}
