//! Deterministic simulation testing for [`BTree`](crate::BTree).
//!
//! A seeded generator drives random inserts, deletes and lookups against a
//! tree and a `std::collections::BTreeMap` model side by side. After every
//! operation the tree's structure is validated and its answers are compared
//! with the model's. Given the same seed, a run is identical.
//!
//! # Usage
//!
//! ```ignore
//! let config = SimulatorConfig::new(12345).with_degree(4);
//! let result = Simulator::new(config).run(1000);
//! assert!(result.passed(), "{:?}", result.violations);
//! ```

mod model;
mod op_gen;
mod simulator;
