//! Generic (unbalanced) multi-way search tree.
//!
//! Every node holds up to `degree - 1` sorted entries and up to `degree`
//! children. Child `i` holds keys between entry `i - 1` and entry `i`.
//! Insertion and deletion only respect per-node capacity: the tree never
//! splits or merges, so its shape depends on insertion order. The B-tree in
//! [`crate::btree`] reuses the node layout, search and traversals and brings
//! its own balanced insert/delete.

use std::cmp::Ordering;
use std::fmt;

use crate::multiway::node::{Entry, Node, NodeArena, NodeId};
use crate::multiway::traversal::{self, TraversalOrder};

/// An unbalanced multi-way search tree.
#[derive(Debug, Clone)]
pub struct MWayTree<K, V> {
    pub(crate) nodes: NodeArena<K, V>,
    pub(crate) root: Option<NodeId>,
    pub(crate) degree: usize,
    /// Number of entries in the tree.
    pub(crate) len: usize,
}

impl<K: Ord, V> MWayTree<K, V> {
    /// Smallest degree a multi-way tree accepts (a binary search tree).
    pub const MIN_DEGREE: usize = 2;

    /// Create an empty tree whose nodes have `degree` child slots.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DegreeTooSmall`] if `degree < 2`.
    pub fn new(degree: usize) -> Result<Self, TreeError> {
        Self::with_min_degree(degree, Self::MIN_DEGREE)
    }

    pub(crate) fn with_min_degree(degree: usize, minimum: usize) -> Result<Self, TreeError> {
        if degree < minimum {
            return Err(TreeError::DegreeTooSmall { degree, minimum });
        }
        tracing::debug!(degree, "created multi-way tree");
        Ok(Self {
            nodes: NodeArena::new(),
            root: None,
            degree,
            len: 0,
        })
    }

    /// The maximum number of children per node.
    #[must_use]
    pub const fn degree(&self) -> usize {
        self.degree
    }

    /// The root node, if the tree is not empty.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Read access to the node storage, for inspecting tree shape.
    #[must_use]
    pub const fn nodes(&self) -> &NodeArena<K, V> {
        &self.nodes
    }

    /// Whether the tree holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of entries in the tree.
    #[must_use]
    pub const fn cardinality(&self) -> usize {
        self.len
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Number of levels; 0 for an empty tree, 1 for a lone root.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<NodeId> = self.root.into_iter().collect();
        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|&id| self.nodes.get(id).children())
                .collect();
        }
        height
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Look up the value stored under `key`.
    #[must_use]
    pub fn search(&self, key: &K) -> Option<&V> {
        let (id, index) = self.locate(key)?;
        self.nodes.get(id).entry(index).map(|entry| &entry.value)
    }

    /// Look up the value stored under `key` for modification.
    pub fn search_mut(&mut self, key: &K) -> Option<&mut V> {
        let (id, index) = self.locate(key)?;
        self.nodes
            .get_mut(id)
            .entry_mut(index)
            .map(|entry| &mut entry.value)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    /// The entry with the smallest key.
    #[must_use]
    pub fn min(&self) -> Option<&Entry<K, V>> {
        let mut id = self.root?;
        loop {
            let node = self.nodes.get(id);
            match node.child(0) {
                Some(child) => id = child,
                None => return node.entry(0),
            }
        }
    }

    /// The entry with the largest key.
    #[must_use]
    pub fn max(&self) -> Option<&Entry<K, V>> {
        let mut id = self.root?;
        loop {
            let node = self.nodes.get(id);
            let count = node.count_entries();
            match node.child(count) {
                Some(child) => id = child,
                None => return node.entry(count.checked_sub(1)?),
            }
        }
    }

    /// Collect all entries in the given order.
    ///
    /// Uses an explicit stack or queue. Each call starts from scratch.
    #[must_use]
    pub fn traverse(&self, order: TraversalOrder) -> Vec<&Entry<K, V>> {
        traversal::iterative(&self.nodes, self.root, order)
    }

    /// Collect all entries in the given order by recursion.
    ///
    /// Produces exactly the same sequence as [`MWayTree::traverse`].
    #[must_use]
    pub fn traverse_recursive(&self, order: TraversalOrder) -> Vec<&Entry<K, V>> {
        traversal::recursive(&self.nodes, self.root, order)
    }

    /// Insert `value` under `key`, returning the value it replaced.
    ///
    /// New keys go into the node where the search fell off the tree if it
    /// has a free entry slot, otherwise into a new child node hung in the
    /// empty child slot. The tree is not rebalanced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(mut id) = self.root else {
            let root = self.nodes.alloc(Node::with_entry(self.degree, Entry::new(key, value)));
            self.root = Some(root);
            self.len += 1;
            return None;
        };

        loop {
            let node = self.nodes.get(id);
            let slot = match descend(node, &key) {
                Ok(index) => {
                    return self
                        .nodes
                        .get_mut(id)
                        .entry_mut(index)
                        .map(|entry| std::mem::replace(&mut entry.value, value));
                }
                Err(slot) => slot,
            };

            if let Some(child) = node.child(slot) {
                id = child;
                continue;
            }

            let entry = Entry::new(key, value);
            if node.has_no_free_entry() {
                let leaf = self.nodes.alloc(Node::with_entry(self.degree, entry));
                self.nodes.get_mut(id).set_child(slot, Some(leaf));
            } else {
                let node = self.nodes.get_mut(id);
                node.entry_slots_mut()[slot..].rotate_right(1);
                node.set_entry(slot, Some(entry));
                // Child `slot` now sits left of the new entry; open an empty
                // slot on its right.
                node.child_slots_mut()[slot + 1..].rotate_right(1);
            }
            self.len += 1;
            return None;
        }
    }

    /// Remove `key`, returning its value.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if the key is absent. The tree is
    /// left untouched in that case.
    pub fn delete(&mut self, key: &K) -> Result<V, TreeError> {
        // (node, child slot taken) for every ancestor of the current node.
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut id = self.root.ok_or(TreeError::KeyNotFound)?;
        let index = loop {
            let node = self.nodes.get(id);
            match descend(node, key) {
                Ok(index) => break index,
                Err(slot) => {
                    let child = node.child(slot).ok_or(TreeError::KeyNotFound)?;
                    path.push((id, slot));
                    id = child;
                }
            }
        };

        let removed = self.remove_at(id, index, path).ok_or(TreeError::KeyNotFound)?;
        self.len -= 1;
        Ok(removed.value)
    }

    /// Remove entry `index` of node `id`, whose ancestors are `path`.
    fn remove_at(
        &mut self,
        mut id: NodeId,
        index: usize,
        mut path: Vec<(NodeId, usize)>,
    ) -> Option<Entry<K, V>> {
        let node = self.nodes.get(id);
        let removed = match (node.child(index), node.child(index + 1)) {
            (Some(left), Some(_)) => {
                // Both neighbours are populated: pull up the in-order
                // predecessor. It is the last entry of its node and its
                // right child slot is empty.
                path.push((id, index));
                let mut pred = left;
                loop {
                    let node = self.nodes.get(pred);
                    let count = node.count_entries();
                    match node.child(count) {
                        Some(next) => {
                            path.push((pred, count));
                            pred = next;
                        }
                        None => break,
                    }
                }
                let count = self.nodes.get(pred).count_entries();
                let predecessor = unlink(self.nodes.get_mut(pred), count - 1, count)?;
                let removed = self.nodes.get_mut(id).set_entry(index, Some(predecessor));
                id = pred;
                removed
            }
            (_, None) => unlink(self.nodes.get_mut(id), index, index + 1),
            (None, Some(_)) => unlink(self.nodes.get_mut(id), index, index),
        };

        if self.nodes.get(id).count_entries() == 0 {
            // An entry-less node has at most one child left, in slot 0.
            let orphan = self.nodes.free(id).child(0);
            tracing::trace!(node = %id, "collapsed empty node");
            match path.last() {
                Some(&(parent, slot)) => {
                    self.nodes.get_mut(parent).set_child(slot, orphan);
                }
                None => self.root = orphan,
            }
        }

        removed
    }

    /// Find the node and slot holding `key`.
    fn locate(&self, key: &K) -> Option<(NodeId, usize)> {
        let mut id = self.root?;
        loop {
            let node = self.nodes.get(id);
            match descend(node, key) {
                Ok(index) => return Some((id, index)),
                Err(slot) => id = node.child(slot)?,
            }
        }
    }
}

/// Scan a node's entries left to right.
///
/// Returns `Ok(i)` when entry `i` holds `key`, or `Err(i)` with the child
/// slot to descend into: the first entry with a greater key, or the last
/// child when no entry is greater.
pub(crate) fn descend<K: Ord, V>(node: &Node<K, V>, key: &K) -> Result<usize, usize> {
    let mut count = 0;
    for (i, entry) in node.entries().enumerate() {
        match key.cmp(&entry.key) {
            Ordering::Equal => return Ok(i),
            Ordering::Less => return Err(i),
            Ordering::Greater => count = i + 1,
        }
    }
    Err(count)
}

/// Remove entry `entry_index` together with the empty child slot
/// `child_index` (one of the entry's two neighbours).
fn unlink<K, V>(node: &mut Node<K, V>, entry_index: usize, child_index: usize) -> Option<Entry<K, V>> {
    let entry = node.take_entry(entry_index)?;
    node.entry_slots_mut()[entry_index..].rotate_left(1);
    debug_assert!(node.child(child_index).is_none());
    node.child_slots_mut()[child_index..].rotate_left(1);
    Some(entry)
}

impl<K: fmt::Debug, V> fmt::Display for MWayTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            None => writeln!(f, "(empty)"),
            Some(root) => render(f, &self.nodes, root, "", None),
        }
    }
}

/// Write one node and its subtree as an indented branch diagram.
///
/// `last` is `None` for the root, otherwise whether the node is the last
/// child of its parent.
pub(crate) fn render<K: fmt::Debug, V>(
    f: &mut fmt::Formatter<'_>,
    nodes: &NodeArena<K, V>,
    id: NodeId,
    prefix: &str,
    last: Option<bool>,
) -> fmt::Result {
    let node = nodes.get(id);
    let (branch, extension) = match last {
        None => ("", ""),
        Some(true) => ("└── ", "    "),
        Some(false) => ("├── ", "│   "),
    };

    write!(f, "{prefix}{branch}[")?;
    for (i, entry) in node.entries().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{:?}", entry.key)?;
    }
    writeln!(f, "]")?;

    let child_prefix = format!("{prefix}{extension}");
    let children: Vec<NodeId> = node.children().collect();
    for (i, &child) in children.iter().enumerate() {
        render(f, nodes, child, &child_prefix, Some(i + 1 == children.len()))?;
    }
    Ok(())
}

/// Errors returned by tree operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The requested degree cannot support the tree's algorithms.
    DegreeTooSmall { degree: usize, minimum: usize },
    /// The key to delete is not in the tree.
    KeyNotFound,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegreeTooSmall { degree, minimum } => {
                write!(f, "degree {degree} is too small (minimum {minimum})")
            }
            Self::KeyNotFound => write!(f, "key not found"),
        }
    }
}

impl std::error::Error for TreeError {}
