//! Simulation harness tying the generator, tree and model together.

use crate::btree::BTree;

use super::model::{Mismatch, ModelChecker};
use super::op_gen::{Operation, OperationGenConfig, OperationGenerator};

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Degree of the tree under test.
    pub degree: usize,
    /// Operation generation configuration.
    pub op_config: OperationGenConfig,
    /// Compare full contents every this many steps. Structure and results
    /// are still checked on every step.
    pub check_interval: usize,
}

impl SimulatorConfig {
    /// Create a new simulator config with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            degree: 3,
            op_config: OperationGenConfig::default(),
            check_interval: 1,
        }
    }

    /// Set the tree degree.
    #[must_use]
    pub const fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    /// Set the key space.
    #[must_use]
    pub const fn with_key_space(mut self, key_space: u32) -> Self {
        self.op_config.key_space = key_space;
        self
    }

    /// Set the insert and delete rates.
    #[must_use]
    pub const fn with_rates(mut self, insert_rate: f64, delete_rate: f64) -> Self {
        self.op_config.insert_rate = insert_rate;
        self.op_config.delete_rate = delete_rate;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// Number of operations applied.
    pub operations: u64,
    /// Inserts of new keys.
    pub inserts: u64,
    /// Inserts that overwrote an existing key.
    pub overwrites: u64,
    /// Deletes that removed a key.
    pub deletes: u64,
    /// Deletes and searches of absent keys.
    pub misses: u64,
    /// Height of the tree when the run ended.
    pub final_height: usize,
    /// Problems detected. The run stops at the first one.
    pub violations: Vec<Mismatch>,
}

impl SimulationResult {
    /// Check if the simulation passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// The main simulator harness.
pub struct Simulator {
    config: SimulatorConfig,
    generator: OperationGenerator,
    checker: ModelChecker,
}

impl Simulator {
    /// Create a new simulator with the given configuration.
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        let generator = OperationGenerator::with_config(config.seed, config.op_config.clone());
        Self {
            config,
            generator,
            checker: ModelChecker::new(),
        }
    }

    /// Run `count` operations against a fresh tree.
    ///
    /// # Panics
    ///
    /// Panics if the configured degree is below the B-tree minimum.
    pub fn run(&mut self, count: usize) -> SimulationResult {
        let Ok(mut tree) = BTree::new(self.config.degree) else {
            panic!("degree {} is too small for a B-tree", self.config.degree);
        };
        let mut result = SimulationResult {
            seed: self.config.seed,
            operations: 0,
            inserts: 0,
            overwrites: 0,
            deletes: 0,
            misses: 0,
            final_height: 0,
            violations: Vec::new(),
        };

        for step in 0..count {
            let operation = self.generator.next_operation();
            let before = self.checker.key_count();
            if let Err(mismatch) = self.checker.apply(&mut tree, step, operation) {
                result.violations.push(mismatch);
                break;
            }
            result.operations += 1;
            let after = self.checker.key_count();
            match operation {
                Operation::Insert { .. } if after > before => result.inserts += 1,
                Operation::Insert { .. } => result.overwrites += 1,
                Operation::Delete { .. } if after < before => result.deletes += 1,
                Operation::Delete { key } | Operation::Search { key } => {
                    if !tree.contains_key(&key) {
                        result.misses += 1;
                    }
                }
            }

            let check = if step % self.config.check_interval.max(1) == 0 {
                self.checker.check(&tree, step)
            } else {
                tree.validate()
                    .map_err(|violation| Mismatch::Structure { step, violation })
            };
            if let Err(mismatch) = check {
                tracing::debug!(seed = self.config.seed, %mismatch, "simulation failed");
                result.violations.push(mismatch);
                break;
            }
        }

        result.final_height = tree.height();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_basic() {
        let mut simulator = Simulator::new(SimulatorConfig::new(12345));
        let result = simulator.run(500);

        assert!(result.passed(), "seed {}: {:?}", result.seed, result.violations);
        assert_eq!(result.operations, 500);
        assert!(result.inserts > 0);
        assert!(result.deletes > 0);
    }

    #[test]
    fn test_simulator_deterministic() {
        let result1 = Simulator::new(SimulatorConfig::new(777).with_degree(5)).run(300);
        let result2 = Simulator::new(SimulatorConfig::new(777).with_degree(5)).run(300);

        assert_eq!(result1.inserts, result2.inserts);
        assert_eq!(result1.overwrites, result2.overwrites);
        assert_eq!(result1.deletes, result2.deletes);
        assert_eq!(result1.misses, result2.misses);
        assert_eq!(result1.final_height, result2.final_height);
    }

    #[test]
    fn test_simulator_many_seeds_and_degrees() {
        for degree in [3, 4, 5, 6, 8, 13] {
            for seed in 0..8 {
                let config = SimulatorConfig::new(seed).with_degree(degree);
                let result = Simulator::new(config).run(400);
                assert!(
                    result.passed(),
                    "degree {degree}, seed {seed}: {:?}",
                    result.violations
                );
            }
        }
    }

    #[test]
    fn test_simulator_grow_then_shrink() {
        // Mostly inserts into a wide key space, then mostly deletes.
        let config = SimulatorConfig::new(2024)
            .with_degree(4)
            .with_key_space(5_000)
            .with_rates(0.9, 0.05);
        let grown = Simulator::new(config).run(2_000);
        assert!(grown.passed(), "{:?}", grown.violations);
        assert!(grown.final_height >= 4);

        let config = SimulatorConfig::new(2025)
            .with_degree(4)
            .with_key_space(64)
            .with_rates(0.1, 0.8);
        let shrunk = Simulator::new(config).run(2_000);
        assert!(shrunk.passed(), "{:?}", shrunk.violations);
        assert!(shrunk.misses > 0);
    }

    #[test]
    #[ignore] // Long running test
    fn test_simulator_stress() {
        let mut config = SimulatorConfig::new(99999)
            .with_degree(7)
            .with_key_space(20_000);
        config.check_interval = 100;
        let result = Simulator::new(config).run(100_000);
        assert!(result.passed(), "{:?}", result.violations);
    }
}
