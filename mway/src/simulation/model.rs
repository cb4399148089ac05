//! Reference model for checking tree behavior during simulation.

use std::collections::BTreeMap;
use std::fmt;

use crate::btree::{BTree, InvariantViolation};
use crate::multiway::{TraversalOrder, TreeError};

use super::op_gen::Operation;

/// A disagreement between the tree and the model, or a broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The tree and the model returned different results.
    Result {
        /// Index of the operation in the run.
        step: usize,
        /// The operation that disagreed.
        operation: Operation,
        /// What the model returned.
        expected: String,
        /// What the tree returned.
        actual: String,
    },
    /// The tree's contents drifted from the model.
    Contents { step: usize, description: String },
    /// The tree's structure is broken.
    Structure {
        step: usize,
        violation: InvariantViolation,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Result {
                step,
                operation,
                expected,
                actual,
            } => write!(
                f,
                "step {step}: {operation:?} returned {actual}, expected {expected}"
            ),
            Self::Contents { step, description } => write!(f, "step {step}: {description}"),
            Self::Structure { step, violation } => write!(f, "step {step}: {violation}"),
        }
    }
}

/// Applies operations to a tree and a `BTreeMap` in lockstep.
pub struct ModelChecker {
    model: BTreeMap<u32, u64>,
}

impl ModelChecker {
    /// Create a checker with an empty model.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            model: BTreeMap::new(),
        }
    }

    /// Number of keys the model holds.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.model.len()
    }

    /// Apply `operation` to both sides and compare the results.
    pub fn apply(
        &mut self,
        tree: &mut BTree<u32, u64>,
        step: usize,
        operation: Operation,
    ) -> Result<(), Mismatch> {
        let (expected, actual) = match operation {
            Operation::Insert { key, value } => (
                format!("{:?}", self.model.insert(key, value)),
                format!("{:?}", tree.insert(key, value)),
            ),
            Operation::Delete { key } => (
                format!("{:?}", self.model.remove(&key).ok_or(TreeError::KeyNotFound)),
                format!("{:?}", tree.delete(&key)),
            ),
            Operation::Search { key } => (
                format!("{:?}", self.model.get(&key)),
                format!("{:?}", tree.search(&key)),
            ),
        };
        if expected != actual {
            return Err(Mismatch::Result {
                step,
                operation,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Compare the whole tree against the model and validate its structure.
    pub fn check(&self, tree: &BTree<u32, u64>, step: usize) -> Result<(), Mismatch> {
        tree.validate()
            .map_err(|violation| Mismatch::Structure { step, violation })?;

        if tree.cardinality() != self.model.len() {
            return Err(Mismatch::Contents {
                step,
                description: format!(
                    "tree holds {} entries, model holds {}",
                    tree.cardinality(),
                    self.model.len()
                ),
            });
        }

        let contents: Vec<(u32, u64)> = tree
            .traverse(TraversalOrder::InOrder)
            .iter()
            .map(|entry| (entry.key, entry.value))
            .collect();
        let expected: Vec<(u32, u64)> = self.model.iter().map(|(&k, &v)| (k, v)).collect();
        if contents != expected {
            return Err(Mismatch::Contents {
                step,
                description: "in-order traversal differs from model".to_string(),
            });
        }

        let bounds = (tree.min().map(|e| e.key), tree.max().map(|e| e.key));
        let model_bounds = (
            self.model.keys().next().copied(),
            self.model.keys().next_back().copied(),
        );
        if bounds != model_bounds {
            return Err(Mismatch::Contents {
                step,
                description: format!("min/max {bounds:?}, expected {model_bounds:?}"),
            });
        }
        Ok(())
    }
}

impl Default for ModelChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_operations() {
        let mut tree = BTree::new(3).expect("create tree");
        let mut checker = ModelChecker::new();
        let ops = [
            Operation::Insert { key: 5, value: 50 },
            Operation::Insert { key: 5, value: 51 },
            Operation::Search { key: 5 },
            Operation::Delete { key: 9 },
            Operation::Delete { key: 5 },
        ];
        for (step, op) in ops.into_iter().enumerate() {
            checker.apply(&mut tree, step, op).expect("agree");
            checker.check(&tree, step).expect("consistent");
        }
        assert_eq!(checker.key_count(), 0);
    }

    #[test]
    fn test_key_count_tracks_model() {
        let mut tree = BTree::new(4).expect("create tree");
        let mut checker = ModelChecker::new();
        let ops = [
            Operation::Insert { key: 1, value: 10 },
            Operation::Insert { key: 2, value: 20 },
            Operation::Insert { key: 1, value: 11 },
            Operation::Search { key: 3 },
        ];
        for (step, op) in ops.into_iter().enumerate() {
            checker.apply(&mut tree, step, op).expect("agree");
        }
        assert_eq!(checker.key_count(), 2);
        assert_eq!(checker.key_count(), tree.cardinality());

        checker
            .apply(&mut tree, ops.len(), Operation::Delete { key: 2 })
            .expect("agree");
        assert_eq!(checker.key_count(), 1);
        checker.check(&tree, ops.len()).expect("consistent");
    }

    #[test]
    fn test_detects_drift() {
        let mut tree = BTree::new(3).expect("create tree");
        let checker = ModelChecker::new();
        tree.insert(1, 1);
        let mismatch = checker.check(&tree, 0).expect_err("tree has an extra key");
        assert!(matches!(mismatch, Mismatch::Contents { step: 0, .. }));
        assert_eq!(
            mismatch.to_string(),
            "step 0: tree holds 1 entries, model holds 0"
        );
    }
}
