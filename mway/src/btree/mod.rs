//! Balanced multi-way search tree (B-tree).
//!
//! Built on the node storage of [`crate::multiway`]. Insertion splits
//! overflowing nodes bottom-up; deletion repairs underflowing nodes by
//! borrowing from or merging with a sibling, cascading towards the root.

mod delete;
mod insert;
mod invariants;
mod node;
mod tree;

pub use invariants::InvariantViolation;
pub use tree::{BTree, Limits};
