//! Node storage for multi-way search trees.
//!
//! A node is a fixed-capacity container:
//! - up to `degree - 1` entry slots
//! - up to `degree` child slots
//!
//! Nodes never reference each other directly. Every node of a tree lives in a
//! [`NodeArena`] and children are stored as [`NodeId`]s into that arena, so the
//! tree has a single owner and no reference cycles.
//!
//! Nothing here validates ordering. Keeping entries sorted and children in
//! the right slots is the job of the tree algorithms built on top.

use std::fmt;

/// A key/value pair stored in a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    /// Create a new entry.
    #[must_use]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

/// Index of a node inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fixed-capacity tree node.
///
/// Capacity is set by the degree given at construction: `degree - 1` entry
/// slots and `degree` child slots. Out-of-range slot indices panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K, V> {
    entries: Box<[Option<Entry<K, V>>]>,
    children: Box<[Option<NodeId>]>,
}

impl<K, V> Node<K, V> {
    /// Create an empty node for a tree of the given degree.
    ///
    /// # Panics
    ///
    /// Panics if `degree < 2`. Trees validate their degree before creating
    /// nodes, so this only fires on a programming error.
    #[must_use]
    pub fn new(degree: usize) -> Self {
        assert!(degree >= 2, "node degree must be at least 2, got {degree}");
        Self {
            entries: std::iter::repeat_with(|| None).take(degree - 1).collect(),
            children: vec![None; degree].into_boxed_slice(),
        }
    }

    /// Create a node holding a single entry.
    #[must_use]
    pub fn with_entry(degree: usize, entry: Entry<K, V>) -> Self {
        let mut node = Self::new(degree);
        node.entries[0] = Some(entry);
        node
    }

    /// The degree this node was built for (number of child slots).
    #[must_use]
    pub fn degree(&self) -> usize {
        self.children.len()
    }

    /// Number of entry slots.
    #[must_use]
    pub fn entry_capacity(&self) -> usize {
        self.entries.len()
    }

    /// Get the entry in slot `i`.
    #[must_use]
    pub fn entry(&self, i: usize) -> Option<&Entry<K, V>> {
        self.entries[i].as_ref()
    }

    /// Get a mutable reference to the entry in slot `i`.
    pub fn entry_mut(&mut self, i: usize) -> Option<&mut Entry<K, V>> {
        self.entries[i].as_mut()
    }

    /// Store `entry` in slot `i`, returning what was there before.
    pub fn set_entry(&mut self, i: usize, entry: Option<Entry<K, V>>) -> Option<Entry<K, V>> {
        std::mem::replace(&mut self.entries[i], entry)
    }

    /// Empty slot `i`, returning its entry.
    pub fn take_entry(&mut self, i: usize) -> Option<Entry<K, V>> {
        self.entries[i].take()
    }

    /// Get the child reference in slot `i`.
    #[must_use]
    pub fn child(&self, i: usize) -> Option<NodeId> {
        self.children[i]
    }

    /// Store `child` in slot `i`, returning what was there before.
    pub fn set_child(&mut self, i: usize, child: Option<NodeId>) -> Option<NodeId> {
        std::mem::replace(&mut self.children[i], child)
    }

    /// Empty child slot `i`, returning its reference.
    pub fn take_child(&mut self, i: usize) -> Option<NodeId> {
        self.children[i].take()
    }

    /// A node is a leaf iff every child slot is empty.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Number of populated entry slots.
    #[must_use]
    pub fn count_entries(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Number of populated child slots.
    #[must_use]
    pub fn count_children(&self) -> usize {
        self.children.iter().filter(|c| c.is_some()).count()
    }

    /// Whether every child slot is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.children.iter().all(Option::is_some)
    }

    /// Whether every entry slot is occupied.
    #[must_use]
    pub fn has_no_free_entry(&self) -> bool {
        self.entries.iter().all(Option::is_some)
    }

    /// Iterate over the populated entries in slot order.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &Entry<K, V>> {
        self.entries.iter().flatten()
    }

    /// Iterate over the populated child references in slot order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }

    pub(crate) fn entry_slots_mut(&mut self) -> &mut [Option<Entry<K, V>>] {
        &mut self.entries
    }

    pub(crate) fn child_slots_mut(&mut self) -> &mut [Option<NodeId>] {
        &mut self.children
    }
}

/// Owner of every node in one tree.
///
/// Freed slots are kept on a free list and handed out again by
/// [`NodeArena::alloc`]. Using a [`NodeId`] after it was freed is a
/// programming error and panics.
#[derive(Debug, Clone)]
pub struct NodeArena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
}

impl<K, V> Default for NodeArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> NodeArena<K, V> {
    /// Create an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Take ownership of `node` and return its id.
    pub fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(node);
            NodeId(index)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    /// Remove a node from the arena and hand it back to the caller.
    pub fn free(&mut self, id: NodeId) -> Node<K, V> {
        let Some(node) = self.slots[id.0].take() else {
            panic!("node {id} freed twice");
        };
        self.free.push(id.0);
        node
    }

    /// Swap the node stored at `id` for `node`, returning the old one.
    pub fn replace(&mut self, id: NodeId, node: Node<K, V>) -> Node<K, V> {
        let Some(slot) = self.slots[id.0].as_mut() else {
            panic!("node {id} used after free");
        };
        std::mem::replace(slot, node)
    }

    /// Borrow the node stored at `id`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node<K, V> {
        match self.slots[id.0].as_ref() {
            Some(node) => node,
            None => panic!("node {id} used after free"),
        }
    }

    /// Mutably borrow the node stored at `id`.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.slots[id.0].as_mut() {
            Some(node) => node,
            None => panic!("node {id} used after free"),
        }
    }

    /// Number of live nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether the arena holds no live nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
