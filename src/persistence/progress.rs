//! The persisted progress record
//!
//! Parsing is lenient: a partial or partly invalid record keeps whatever
//! fields are usable and takes defaults for the rest, so saves written by an
//! older catalog still load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProgressError;
use crate::upgrades::catalog::{self, UpgradeKey};

/// Coins, current level and bought upgrade levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Progress {
    pub coins: u64,
    pub level: u32,
    pub upgrades: BTreeMap<UpgradeKey, u32>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            coins: 0,
            level: 1,
            upgrades: UpgradeKey::ALL.into_iter().map(|key| (key, 0)).collect(),
        }
    }
}

impl Progress {
    pub fn level_of(&self, key: UpgradeKey) -> u32 {
        self.upgrades.get(&key).copied().unwrap_or(0)
    }

    pub fn set_level(&mut self, key: UpgradeKey, level: u32) {
        self.upgrades.insert(key, level);
    }

    pub fn add_coins(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub fn to_json(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored record, merging missing or invalid fields from defaults
    ///
    /// Fails only when the text is not a JSON object at all.
    pub fn from_json(json: &str) -> Result<Self, ProgressError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ProgressError::CorruptedProgress(e.to_string()))?;
        Self::try_from(value)
    }

    /// Parse a record, falling back to defaults if it is unusable
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            log::warn!("{e}; starting from default progress");
            Self::default()
        })
    }
}

/// Lenient merge shared by `from_json` and serde deserialization
impl TryFrom<Value> for Progress {
    type Error = ProgressError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(fields) = value else {
            return Err(ProgressError::CorruptedProgress(
                "record is not an object".to_string(),
            ));
        };

        let mut progress = Progress::default();

        if let Some(coins) = fields.get("coins") {
            match coins.as_u64() {
                Some(coins) => progress.coins = coins,
                None => log::warn!("Ignoring invalid coin balance {coins}"),
            }
        }

        if let Some(level) = fields.get("level") {
            match level.as_u64().and_then(|l| u32::try_from(l).ok()) {
                Some(level) if level >= 1 => progress.level = level,
                _ => log::warn!("Ignoring invalid level {level}"),
            }
        }

        if let Some(upgrades) = fields.get("upgrades") {
            match upgrades.as_object() {
                Some(upgrades) => {
                    for (name, level) in upgrades {
                        let Some(key) = UpgradeKey::parse(name) else {
                            log::debug!("Skipping unknown upgrade {name}");
                            continue;
                        };
                        let Some(level) = level.as_u64() else {
                            log::warn!("Ignoring invalid level for {key}");
                            continue;
                        };
                        let max = catalog::find(key).map_or(0, |def| def.max_level);
                        progress.set_level(key, level.min(max as u64) as u32);
                    }
                }
                None => log::warn!("Ignoring malformed upgrades table"),
            }
        }

        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_every_upgrade_at_zero() {
        let progress = Progress::default();
        assert_eq!(progress.coins, 0);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.upgrades.len(), UpgradeKey::ALL.len());
        assert!(progress.upgrades.values().all(|&l| l == 0));
    }

    #[test]
    fn test_json_shape() {
        let mut progress = Progress::default();
        progress.coins = 42;
        progress.set_level(UpgradeKey::PaddleHp, 2);
        let json = progress.to_json().unwrap();
        assert!(json.contains(r#""coins":42"#));
        assert!(json.contains(r#""paddleHp":2"#));
        assert!(json.contains(r#""coinMultiplier":0"#));
    }

    #[test]
    fn test_partial_record_merges_defaults() {
        let progress = Progress::from_json(r#"{ "coins": 120, "upgrades": { "shooting": 2 } }"#)
            .unwrap();
        assert_eq!(progress.coins, 120);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.level_of(UpgradeKey::Shooting), 2);
        assert_eq!(progress.level_of(UpgradeKey::Missile), 0);
        assert_eq!(progress.upgrades.len(), UpgradeKey::ALL.len());
    }

    #[test]
    fn test_invalid_fields_fall_back() {
        let progress = Progress::from_json(
            r#"{ "coins": -5, "level": 0, "upgrades": { "paddleHp": "lots", "laser": 4, "extraLives": 99 } }"#,
        )
        .unwrap();
        assert_eq!(progress.coins, 0);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.level_of(UpgradeKey::PaddleHp), 0);
        // Clamped to the catalog max
        assert_eq!(progress.level_of(UpgradeKey::ExtraLives), 3);
    }

    #[test]
    fn test_serde_deserialize_clamps_levels() {
        let progress: Progress =
            serde_json::from_str(r#"{"coins":5,"upgrades":{"extraLives":99,"laser":2}}"#).unwrap();
        assert_eq!(progress.coins, 5);
        assert_eq!(progress.level_of(UpgradeKey::ExtraLives), 3);
        assert_eq!(progress.upgrades.len(), UpgradeKey::ALL.len());
        assert!(serde_json::from_str::<Progress>("[1, 2]").is_err());
    }

    #[test]
    fn test_garbage_is_corrupted() {
        assert!(matches!(
            Progress::from_json("not json"),
            Err(ProgressError::CorruptedProgress(_))
        ));
        assert!(matches!(
            Progress::from_json("[1, 2, 3]"),
            Err(ProgressError::CorruptedProgress(_))
        ));
        assert_eq!(Progress::from_json_or_default("{{{"), Progress::default());
    }
}
