//! B-tree insertion with split propagation.
//!
//! The new entry always lands in a leaf. The leaf's contents are moved into
//! a scratch node with one spare slot, the entry is inserted in order, and
//! the scratch node is either committed back (it fits) or split around its
//! middle entry. A split pushes the separator into the parent, which may in
//! turn overflow; this repeats up the ancestor stack until a node absorbs
//! the separator or a new root is created.

use crate::btree::tree::{BTree, Limits};
use crate::multiway::{Entry, Node, NodeId};

impl<K: Ord, V> BTree<K, V> {
    /// Insert `value` under `key`, returning the value it replaced.
    ///
    /// Replacing the value of an existing key never changes the tree's shape.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let degree = self.limits.degree;
        let Some(mut id) = self.tree.root else {
            let root = Node::with_entry(degree, Entry::new(key, value));
            self.tree.root = Some(self.tree.nodes.alloc(root));
            self.tree.len += 1;
            return None;
        };

        let mut ancestors = Vec::new();
        loop {
            let node = self.tree.nodes.get(id);
            if let Some(index) = node.index_of_entry(&key) {
                return self
                    .tree
                    .nodes
                    .get_mut(id)
                    .entry_mut(index)
                    .map(|entry| std::mem::replace(&mut entry.value, value));
            }
            match node.child(node.first_index_with_greater_key(&key)) {
                Some(child) => {
                    ancestors.push(id);
                    id = child;
                }
                None => break,
            }
        }

        let mut scratch = self
            .tree
            .nodes
            .replace(id, Node::new(degree))
            .resized(degree + 1);
        scratch.insert_ordered(Entry::new(key, value));
        self.tree.len += 1;
        self.split_upward(id, scratch, ancestors);
        None
    }

    /// Settle `scratch` into node `id`, splitting and walking up `ancestors`
    /// for as long as nodes overflow.
    fn split_upward(&mut self, mut id: NodeId, mut scratch: Node<K, V>, mut ancestors: Vec<NodeId>) {
        let limits = self.limits;
        loop {
            if scratch.count_entries() <= limits.max_keys {
                self.tree.nodes.replace(id, scratch.resized(limits.degree));
                return;
            }

            let (left, separator, right) = split(scratch, limits);
            self.tree.nodes.replace(id, left);
            let right = self.tree.nodes.alloc(right);
            tracing::trace!(left = %id, right = %right, "split node");

            let Some(parent) = ancestors.pop() else {
                let mut root = Node::with_entry(limits.degree, separator);
                root.set_child(0, Some(id));
                root.set_child(1, Some(right));
                let root = self.tree.nodes.alloc(root);
                self.tree.root = Some(root);
                tracing::trace!(root = %root, "grew new root");
                return;
            };

            scratch = self
                .tree
                .nodes
                .replace(parent, Node::new(limits.degree))
                .resized(limits.degree + 1);
            let index = scratch.insert_ordered(separator);
            // The left half kept the split node's id and slot; the right half
            // belongs immediately after it.
            debug_assert_eq!(scratch.index_of_child(id), Some(index));
            scratch.insert_child(index + 1, right);
            id = parent;
        }
    }
}

/// Split an overflowing scratch node around entry `min_keys`.
///
/// Returns the left half, the separator and the right half, each half built
/// at normal capacity with its slice of children.
fn split<K, V>(mut scratch: Node<K, V>, limits: Limits) -> (Node<K, V>, Entry<K, V>, Node<K, V>) {
    let mid = limits.min_keys;
    let total = scratch.count_entries();
    let mut left = Node::new(limits.degree);
    let mut right = Node::new(limits.degree);

    for i in 0..mid {
        left.set_entry(i, scratch.take_entry(i));
        left.set_child(i, scratch.take_child(i));
    }
    left.set_child(mid, scratch.take_child(mid));

    let Some(separator) = scratch.take_entry(mid) else {
        unreachable!("overflowing node has an entry at {mid}");
    };

    for i in (mid + 1)..total {
        right.set_entry(i - mid - 1, scratch.take_entry(i));
        right.set_child(i - mid - 1, scratch.take_child(i));
    }
    right.set_child(total - mid - 1, scratch.take_child(total));

    (left, separator, right)
}
