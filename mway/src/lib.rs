// Forbid unwrap() in library code; tests may use it for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

//! Multi-way search trees for teaching classic algorithms.
//!
//! Two trees share one node layout:
//!  - [`MWayTree`]: a generic multi-way search tree whose insert/delete only
//!    respect per-node capacity
//!  - [`BTree`]: a balanced multi-way tree that splits on overflow and
//!    borrows or merges on underflow, keeping all leaves on one level
//!
//! Both are single-threaded, purely in-memory structures.

pub mod btree;
pub mod config;
pub mod multiway;
#[cfg(test)]
mod simulation;

pub use btree::{BTree, InvariantViolation, Limits};
pub use multiway::{Entry, MWayTree, NodeId, TraversalOrder, TreeError};
