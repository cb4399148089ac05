//! Reproducible operation streams for simulation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One operation applied to both the tree and the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Insert or overwrite a key.
    Insert { key: u32, value: u64 },
    /// Delete a key, which may be absent.
    Delete { key: u32 },
    /// Look a key up.
    Search { key: u32 },
}

/// Configuration for operation generation.
#[derive(Debug, Clone)]
pub struct OperationGenConfig {
    /// Keys are drawn from `0..key_space`. A small space forces overwrites
    /// and deletes of present keys.
    pub key_space: u32,
    /// Probability of an insert.
    pub insert_rate: f64,
    /// Probability of a delete. The rest are searches.
    pub delete_rate: f64,
}

impl Default for OperationGenConfig {
    fn default() -> Self {
        Self {
            key_space: 256,
            insert_rate: 0.5,
            delete_rate: 0.35,
        }
    }
}

/// Seeded generator of [`Operation`]s.
pub struct OperationGenerator {
    rng: StdRng,
    config: OperationGenConfig,
}

impl OperationGenerator {
    /// Create a generator with the given seed and configuration.
    #[must_use]
    pub fn with_config(seed: u64, config: OperationGenConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    /// Produce the next operation.
    pub fn next_operation(&mut self) -> Operation {
        let key = self.rng.random_range(0..self.config.key_space);
        let roll: f64 = self.rng.random();
        if roll < self.config.insert_rate {
            Operation::Insert {
                key,
                value: self.rng.random(),
            }
        } else if roll < self.config.insert_rate + self.config.delete_rate {
            Operation::Delete { key }
        } else {
            Operation::Search { key }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = OperationGenerator::with_config(7, OperationGenConfig::default());
        let mut b = OperationGenerator::with_config(7, OperationGenConfig::default());
        for _ in 0..100 {
            assert_eq!(a.next_operation(), b.next_operation());
        }
    }

    #[test]
    fn test_keys_stay_in_space() {
        let config = OperationGenConfig {
            key_space: 10,
            ..OperationGenConfig::default()
        };
        let mut generator = OperationGenerator::with_config(1, config);
        for _ in 0..500 {
            let key = match generator.next_operation() {
                Operation::Insert { key, .. } | Operation::Delete { key } | Operation::Search { key } => key,
            };
            assert!(key < 10);
        }
    }

    #[test]
    fn test_insert_only() {
        let config = OperationGenConfig {
            insert_rate: 1.0,
            delete_rate: 0.0,
            ..OperationGenConfig::default()
        };
        let mut generator = OperationGenerator::with_config(3, config);
        for _ in 0..100 {
            assert!(matches!(generator.next_operation(), Operation::Insert { .. }));
        }
    }
}
