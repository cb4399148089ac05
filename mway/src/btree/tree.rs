//! Balanced multi-way search tree.
//!
//! The B-tree stores its nodes in an [`MWayTree`] and reuses its search,
//! traversals and statistics. Insertion and deletion are its own (see the
//! `insert` and `delete` modules) and keep every node between `min_keys`
//! and `max_keys` entries with all leaves on the same level.

use std::fmt;

use crate::multiway::{Entry, MWayTree, NodeId, TraversalOrder, TreeError};

/// Capacity limits derived from a B-tree's degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of children per node.
    pub degree: usize,
    /// `degree - 1`
    pub max_keys: usize,
    /// `ceil(degree / 2)`; minimum children of a non-root internal node.
    pub min_childs: usize,
    /// `min_childs - 1`; minimum entries of a non-root node.
    pub min_keys: usize,
}

impl Limits {
    /// Compute the limits for a tree of the given degree.
    #[must_use]
    pub const fn for_degree(degree: usize) -> Self {
        let min_childs = degree.div_ceil(2);
        Self {
            degree,
            max_keys: degree - 1,
            min_childs,
            min_keys: min_childs - 1,
        }
    }
}

/// A B-tree mapping keys to values.
///
/// # Example
///
/// ```
/// use mway::{BTree, TraversalOrder};
///
/// let mut tree = BTree::new(3)?;
/// for key in [10, 20, 30] {
///     tree.insert(key, key * 100);
/// }
///
/// assert_eq!(tree.search(&20), Some(&2000));
/// assert_eq!(tree.height(), 2);
///
/// tree.delete(&10)?;
/// let keys: Vec<i32> = tree.traverse(TraversalOrder::InOrder).iter().map(|e| e.key).collect();
/// assert_eq!(keys, vec![20, 30]);
/// # Ok::<(), mway::TreeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BTree<K, V> {
    pub(crate) tree: MWayTree<K, V>,
    pub(crate) limits: Limits,
}

impl<K: Ord, V> BTree<K, V> {
    /// Smallest degree that supports the borrow/merge case analysis.
    pub const MIN_DEGREE: usize = 3;

    /// Create an empty B-tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DegreeTooSmall`] if `degree < 3`.
    pub fn new(degree: usize) -> Result<Self, TreeError> {
        let tree = MWayTree::with_min_degree(degree, Self::MIN_DEGREE)?;
        Ok(Self {
            tree,
            limits: Limits::for_degree(degree),
        })
    }

    /// The capacity limits of this tree.
    #[must_use]
    pub const fn limits(&self) -> Limits {
        self.limits
    }

    /// The underlying multi-way tree, for read-only inspection.
    #[must_use]
    pub const fn as_mway(&self) -> &MWayTree<K, V> {
        &self.tree
    }

    /// Maximum number of children per node.
    #[must_use]
    pub const fn degree(&self) -> usize {
        self.limits.degree
    }

    /// The root node, if the tree is not empty.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    /// Whether the tree holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub const fn cardinality(&self) -> usize {
        self.tree.cardinality()
    }

    /// Number of nodes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.tree.size()
    }

    /// Number of levels; 0 when empty.
    #[must_use]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Look up the value stored under `key`.
    #[must_use]
    pub fn search(&self, key: &K) -> Option<&V> {
        self.tree.search(key)
    }

    /// Look up the value stored under `key` for modification.
    pub fn search_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tree.search_mut(key)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains_key(key)
    }

    /// The entry with the smallest key.
    #[must_use]
    pub fn min(&self) -> Option<&Entry<K, V>> {
        self.tree.min()
    }

    /// The entry with the largest key.
    #[must_use]
    pub fn max(&self) -> Option<&Entry<K, V>> {
        self.tree.max()
    }

    /// Collect all entries in the given order using an explicit stack/queue.
    #[must_use]
    pub fn traverse(&self, order: TraversalOrder) -> Vec<&Entry<K, V>> {
        self.tree.traverse(order)
    }

    /// Collect all entries in the given order by recursion.
    #[must_use]
    pub fn traverse_recursive(&self, order: TraversalOrder) -> Vec<&Entry<K, V>> {
        self.tree.traverse_recursive(order)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K: fmt::Debug, V> fmt::Display for BTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tree, f)
    }
}
