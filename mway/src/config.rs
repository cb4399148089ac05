//! Demo configuration module.
//!
//! The library itself reads no configuration; this module loads the
//! settings of the `mway-demo` binary from environment variables.
//!
//! # Environment Variables
//!
//! - `MWAY_DEGREE`: B-tree degree (default: `3`, minimum `3`)
//! - `MWAY_KEY_COUNT`: Number of keys to insert (default: `32`)
//! - `MWAY_SEED`: Seed for the key permutation (default: `42`)
//!
//! # Invariants
//!
//! - `degree` is always at least [`BTree::MIN_DEGREE`]
//! - the same seed always produces the same run

use crate::btree::BTree;

/// Demo configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Degree of the demo B-tree.
    pub degree: usize,
    /// How many keys to insert. Keys are `0..key_count` in shuffled order.
    pub key_count: u64,
    /// RNG seed for shuffling keys.
    pub seed: u64,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            degree: Self::DEFAULT_DEGREE,
            key_count: Self::DEFAULT_KEY_COUNT,
            seed: Self::DEFAULT_SEED,
        }
    }
}

impl DemoConfig {
    /// Default tree degree.
    pub const DEFAULT_DEGREE: usize = 3;
    /// Default number of keys.
    pub const DEFAULT_KEY_COUNT: u64 = 32;
    /// Default RNG seed.
    pub const DEFAULT_SEED: u64 = 42;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but does not parse, or if
    /// `MWAY_DEGREE` is below the B-tree minimum.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name: &str| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`DemoConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let degree = Self::load(&lookup, "MWAY_DEGREE", Self::DEFAULT_DEGREE)?;
        if degree < BTree::<u64, u64>::MIN_DEGREE {
            return Err(ConfigError::InvalidValue {
                name: "MWAY_DEGREE".to_string(),
                message: format!(
                    "{degree} is below the minimum degree {}",
                    BTree::<u64, u64>::MIN_DEGREE
                ),
            });
        }

        Ok(Self {
            degree,
            key_count: Self::load(&lookup, "MWAY_KEY_COUNT", Self::DEFAULT_KEY_COUNT)?,
            seed: Self::load(&lookup, "MWAY_SEED", Self::DEFAULT_SEED)?,
        })
    }

    /// Parse one numeric variable, falling back to `default` when unset.
    fn load<T: std::str::FromStr>(
        lookup: &impl Fn(&str) -> Option<String>,
        name: &str,
        default: T,
    ) -> Result<T, ConfigError> {
        match lookup(name) {
            Some(value) => value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                message: format!("'{value}' is not a valid non-negative integer"),
            }),
            None => Ok(default),
        }
    }
}
