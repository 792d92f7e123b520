//! Error types
//!
//! Every error here is recoverable: purchases no-op, level requests are
//! rejected, corrupted saves fall back to defaults.

use thiserror::Error;

use crate::upgrades::UpgradeKey;

/// Why an upgrade purchase was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("not enough coins: need {cost}, have {coins}")]
    InsufficientFunds { cost: u64, coins: u64 },

    #[error("{0} is already at max level")]
    MaxLevelReached(UpgradeKey),

    #[error("{0} is locked behind unmet prerequisites")]
    PrerequisiteUnmet(UpgradeKey),

    #[error("{0} is not in the catalog")]
    UnknownUpgrade(UpgradeKey),

    #[error("purchase could not be saved: {0}")]
    NotSaved(String),
}

/// Level index outside the playable range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level {requested} is outside 1..={max}")]
    InvalidLevelIndex { requested: u32, max: u32 },
}

/// Failures reading or writing the progress record
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("corrupted progress record: {0}")]
    CorruptedProgress(String),

    #[error("progress storage unavailable: {0}")]
    Unavailable(String),

    #[error("progress I/O failed")]
    Io(#[from] std::io::Error),

    #[error("progress serialization failed")]
    Serialize(#[from] serde_json::Error),
}

/// Built-in catalog failed its startup validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("upgrade {0} is defined more than once")]
    DuplicateKey(UpgradeKey),

    #[error("upgrade {upgrade} requires {missing}, which is not in the catalog")]
    UnknownPrerequisite {
        upgrade: UpgradeKey,
        missing: UpgradeKey,
    },

    #[error("upgrade {0} has invalid pricing (cost_scale must exceed 1, max_level at least 1)")]
    InvalidPricing(UpgradeKey),

    #[error("prerequisite cycle through {0}")]
    Cycle(UpgradeKey),
}

/// Tuning file parsed but unusable
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning is not valid JSON")]
    Parse(#[from] serde_json::Error),

    #[error("tuning field {field} = {value} is out of range ({expected})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },
}
