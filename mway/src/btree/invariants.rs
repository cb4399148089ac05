//! Structural invariant checks for [`BTree`].
//!
//! A healthy tree satisfies:
//! - entries and children occupy contiguous slot prefixes
//! - entries within a node are strictly increasing
//! - every non-root node holds between `min_keys` and `max_keys` entries
//! - a non-leaf node with `k` entries has exactly `k + 1` children
//! - every key of child `i` lies between entries `i - 1` and `i` of its parent
//! - all leaves are at the same depth
//! - every live node in the arena is reachable from the root
//! - the cached entry count matches the entries actually stored
//!
//! A violation always means a bug in the balancing code.

use std::fmt;

use crate::btree::tree::BTree;
use crate::multiway::{Node, NodeId};

/// A broken structural invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// The node where the violation was found, if it is node-specific.
    pub node: Option<NodeId>,
    /// Description of the violation.
    pub description: String,
}

impl InvariantViolation {
    fn at(node: NodeId, description: impl Into<String>) -> Self {
        Self {
            node: Some(node),
            description: description.into(),
        }
    }

    fn global(description: impl Into<String>) -> Self {
        Self {
            node: None,
            description: description.into(),
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(node) => write!(f, "invariant violated at node {node}: {}", self.description),
            None => write!(f, "invariant violated: {}", self.description),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// A node waiting to be checked, with the open key interval it must fit in.
struct Pending<'a, K> {
    id: NodeId,
    depth: usize,
    lower: Option<&'a K>,
    upper: Option<&'a K>,
}

impl<K: Ord, V> BTree<K, V> {
    /// Check every structural invariant, returning the first violation.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let nodes = &self.tree.nodes;
        let Some(root) = self.tree.root else {
            if !nodes.is_empty() || self.tree.len != 0 {
                return Err(InvariantViolation::global(format!(
                    "empty tree still owns {} nodes and counts {} entries",
                    nodes.len(),
                    self.tree.len
                )));
            }
            return Ok(());
        };

        let mut leaf_depth = None;
        let mut reachable = 0;
        let mut entries = 0;
        let mut stack = vec![Pending {
            id: root,
            depth: 0,
            lower: None,
            upper: None,
        }];

        while let Some(Pending {
            id,
            depth,
            lower,
            upper,
        }) = stack.pop()
        {
            let node = nodes.get(id);
            reachable += 1;
            let count = self.check_node(id, node, id == root)?;
            entries += count;

            let keys: Vec<&K> = node.entries().map(|entry| &entry.key).collect();
            if lower.is_some_and(|lower| keys.first().is_some_and(|&first| first <= lower)) {
                return Err(InvariantViolation::at(id, "key not above its separator"));
            }
            if upper.is_some_and(|upper| keys.last().is_some_and(|&last| last >= upper)) {
                return Err(InvariantViolation::at(id, "key not below its separator"));
            }

            if node.is_leaf() {
                match leaf_depth {
                    None => leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(InvariantViolation::at(
                            id,
                            format!("leaf at depth {depth}, expected {expected}"),
                        ));
                    }
                    Some(_) => {}
                }
                continue;
            }

            for (i, child) in node.children().enumerate() {
                stack.push(Pending {
                    id: child,
                    depth: depth + 1,
                    lower: if i == 0 { lower } else { Some(keys[i - 1]) },
                    upper: keys.get(i).copied().or(upper),
                });
            }
        }

        if reachable != nodes.len() {
            return Err(InvariantViolation::global(format!(
                "{} live nodes but only {reachable} reachable from the root",
                nodes.len()
            )));
        }
        if entries != self.tree.len {
            return Err(InvariantViolation::global(format!(
                "tree counts {} entries but holds {entries}",
                self.tree.len
            )));
        }
        Ok(())
    }

    /// Check the local shape of one node, returning its entry count.
    fn check_node(&self, id: NodeId, node: &Node<K, V>, is_root: bool) -> Result<usize, InvariantViolation> {
        let limits = self.limits;

        let count = node.count_entries();
        if (0..count).any(|i| node.entry(i).is_none()) {
            return Err(InvariantViolation::at(id, "gap between entries"));
        }
        let children = node.count_children();
        if (0..children).any(|i| node.child(i).is_none()) {
            return Err(InvariantViolation::at(id, "gap between children"));
        }

        if count > limits.max_keys {
            return Err(InvariantViolation::at(
                id,
                format!("{count} entries exceeds maximum {}", limits.max_keys),
            ));
        }
        let minimum = if is_root { 1 } else { limits.min_keys };
        if count < minimum {
            return Err(InvariantViolation::at(
                id,
                format!("{count} entries is below minimum {minimum}"),
            ));
        }

        let sorted = node
            .entries()
            .zip(node.entries().skip(1))
            .all(|(a, b)| a.key < b.key);
        if !sorted {
            return Err(InvariantViolation::at(id, "entries not strictly increasing"));
        }

        if !node.is_leaf() && children != count + 1 {
            return Err(InvariantViolation::at(
                id,
                format!("{count} entries but {children} children"),
            ));
        }

        Ok(count)
    }
}
