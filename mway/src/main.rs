// Forbid unwrap() outside tests.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use mway::{BTree, TraversalOrder, config::DemoConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Loaded configuration: degree={}, key_count={}, seed={}",
        config.degree,
        config.key_count,
        config.seed
    );

    let mut tree = match BTree::new(config.degree) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::error!("Failed to create tree: {e}");
            std::process::exit(1);
        }
    };

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut keys: Vec<u64> = (0..config.key_count).collect();
    keys.shuffle(&mut rng);
    for &key in &keys {
        tree.insert(key, key.wrapping_mul(key));
    }
    report(&tree, "after inserts");

    // Remove every other key of the insertion order.
    for key in keys.iter().step_by(2) {
        if let Err(e) = tree.delete(key) {
            tracing::error!("Failed to delete {key}: {e}");
            std::process::exit(1);
        }
    }
    report(&tree, "after deletes");

    if let Err(e) = tree.validate() {
        tracing::error!("{e}");
        std::process::exit(1);
    }
    tracing::info!("tree is valid");
}

fn report(tree: &BTree<u64, u64>, stage: &str) {
    tracing::info!(
        stage,
        height = tree.height(),
        size = tree.size(),
        cardinality = tree.cardinality(),
        min = ?tree.min().map(|e| e.key),
        max = ?tree.max().map(|e| e.key),
        "tree shape"
    );
    let keys: Vec<u64> = tree
        .traverse(TraversalOrder::LevelOrder)
        .iter()
        .map(|e| e.key)
        .collect();
    tracing::debug!(?keys, "level order");
    tracing::info!("\n{tree}");
}
