//! Meta-progression: upgrade catalog and the prerequisite graph
//!
//! Pure data and pure functions; the only mutation is a purchase against a
//! caller-owned `Progress`.

pub mod catalog;
pub mod graph;

pub use catalog::{CATALOG, Effect, Stat, UpgradeDef, UpgradeKey};
pub use graph::{EdgeState, UpgradeGraph, UpgradeNodeState, cost, node_state};
