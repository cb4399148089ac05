//! Tree traversals.
//!
//! Every order has an iterative and a recursive variant. The iterative ones
//! use an explicit `Vec` stack (depth-first orders) or a `VecDeque` queue
//! (level order). Both variants must produce the same sequence; the tests
//! below and in the tree modules check that.

use std::collections::VecDeque;

use crate::multiway::node::{Entry, NodeArena, NodeId};

/// Order in which a traversal visits entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// A node's entries, then each child subtree left to right.
    PreOrder,
    /// `child 0, entry 0, child 1, entry 1, ..., child k`. Sorted by key.
    InOrder,
    /// Each child subtree left to right, then the node's entries.
    PostOrder,
    /// Breadth first, one level at a time, nodes left to right.
    LevelOrder,
}

impl TraversalOrder {
    /// All supported orders.
    pub const ALL: [Self; 4] = [
        Self::PreOrder,
        Self::InOrder,
        Self::PostOrder,
        Self::LevelOrder,
    ];
}

/// Collect every entry reachable from `root` using explicit stacks/queues.
pub(crate) fn iterative<K, V>(
    nodes: &NodeArena<K, V>,
    root: Option<NodeId>,
    order: TraversalOrder,
) -> Vec<&Entry<K, V>> {
    let mut out = Vec::new();
    let Some(root) = root else {
        return out;
    };

    match order {
        TraversalOrder::PreOrder => {
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                let node = nodes.get(id);
                out.extend(node.entries());
                stack.extend(node.children().rev());
            }
        }
        TraversalOrder::InOrder => {
            // Frame `(id, i)`: emit entry `i - 1` (if any), then visit child `i`.
            let mut stack = vec![(root, 0usize)];
            while let Some((id, i)) = stack.pop() {
                let node = nodes.get(id);
                let count = node.count_entries();
                if i > 0 {
                    out.extend(node.entry(i - 1));
                }
                if i < count {
                    stack.push((id, i + 1));
                }
                if let Some(child) = node.child(i) {
                    stack.push((child, 0));
                }
            }
        }
        TraversalOrder::PostOrder => {
            let mut stack = vec![(root, false)];
            while let Some((id, expanded)) = stack.pop() {
                let node = nodes.get(id);
                if expanded {
                    out.extend(node.entries());
                } else {
                    stack.push((id, true));
                    stack.extend(node.children().rev().map(|child| (child, false)));
                }
            }
        }
        TraversalOrder::LevelOrder => {
            let mut queue = VecDeque::from([root]);
            while let Some(id) = queue.pop_front() {
                let node = nodes.get(id);
                out.extend(node.entries());
                queue.extend(node.children());
            }
        }
    }

    out
}

/// Collect every entry reachable from `root` by recursing on the call stack.
///
/// Level order has no natural recursive form; it recurses once per level
/// over the list of nodes on that level.
pub(crate) fn recursive<K, V>(
    nodes: &NodeArena<K, V>,
    root: Option<NodeId>,
    order: TraversalOrder,
) -> Vec<&Entry<K, V>> {
    let mut out = Vec::new();
    let Some(root) = root else {
        return out;
    };

    match order {
        TraversalOrder::PreOrder => pre_order(nodes, root, &mut out),
        TraversalOrder::InOrder => in_order(nodes, root, &mut out),
        TraversalOrder::PostOrder => post_order(nodes, root, &mut out),
        TraversalOrder::LevelOrder => level_order(nodes, &[root], &mut out),
    }

    out
}

fn pre_order<'a, K, V>(nodes: &'a NodeArena<K, V>, id: NodeId, out: &mut Vec<&'a Entry<K, V>>) {
    let node = nodes.get(id);
    out.extend(node.entries());
    for child in node.children() {
        pre_order(nodes, child, out);
    }
}

fn in_order<'a, K, V>(nodes: &'a NodeArena<K, V>, id: NodeId, out: &mut Vec<&'a Entry<K, V>>) {
    let node = nodes.get(id);
    let count = node.count_entries();
    for i in 0..=count {
        if let Some(child) = node.child(i) {
            in_order(nodes, child, out);
        }
        if i < count {
            out.extend(node.entry(i));
        }
    }
}

fn post_order<'a, K, V>(nodes: &'a NodeArena<K, V>, id: NodeId, out: &mut Vec<&'a Entry<K, V>>) {
    let node = nodes.get(id);
    for child in node.children() {
        post_order(nodes, child, out);
    }
    out.extend(node.entries());
}

fn level_order<'a, K, V>(
    nodes: &'a NodeArena<K, V>,
    level: &[NodeId],
    out: &mut Vec<&'a Entry<K, V>>,
) {
    if level.is_empty() {
        return;
    }
    let mut next = Vec::new();
    for &id in level {
        let node = nodes.get(id);
        out.extend(node.entries());
        next.extend(node.children());
    }
    level_order(nodes, &next, out);
}
