//! Generic multi-way search trees.
//!
//! This module provides the node storage shared by every tree in the crate
//! and an unbalanced multi-way search tree built on it.
//!
//! # Structure
//!
//! - [`Node`]: fixed-capacity entry and child slots
//! - [`NodeArena`]: owns all nodes of a tree, addressed by [`NodeId`]
//! - [`MWayTree`]: search, traversals, statistics, unbalanced insert/delete
//!
//! # Usage
//!
//! ```
//! use mway::{MWayTree, TraversalOrder};
//!
//! let mut tree = MWayTree::new(3)?;
//! for key in [20, 10, 30, 5] {
//!     tree.insert(key, ());
//! }
//!
//! let keys: Vec<i32> = tree.traverse(TraversalOrder::InOrder).iter().map(|e| e.key).collect();
//! assert_eq!(keys, vec![5, 10, 20, 30]);
//! # Ok::<(), mway::TreeError>(())
//! ```

mod node;
mod traversal;
mod tree;

pub use node::{Entry, Node, NodeArena, NodeId};
pub use traversal::TraversalOrder;
pub use tree::{MWayTree, TreeError};
