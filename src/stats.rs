//! Run stats resolved from upgrade levels
//!
//! The resolver only sums catalog contributions; every number comes from the
//! catalog's effect table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::upgrades::{CATALOG, Stat, UpgradeDef, UpgradeKey};

/// Stat bundle applied at run start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub lives: u32,
    pub paddle_half_width: f32,
    pub max_paddle_hp: u32,
    pub max_ammo: u32,
    pub coin_multiplier: f32,
    pub max_bombs: u32,
    pub bomb_radius: f32,
}

impl Default for RunStats {
    /// Stats of a fresh save
    fn default() -> Self {
        resolve(&BTreeMap::new())
    }
}

/// Resolve stats against the built-in catalog
pub fn resolve(upgrades: &BTreeMap<UpgradeKey, u32>) -> RunStats {
    resolve_with(CATALOG, upgrades)
}

/// Resolve stats against an arbitrary catalog
pub fn resolve_with(catalog: &[UpgradeDef], upgrades: &BTreeMap<UpgradeKey, u32>) -> RunStats {
    let mut lives = 0.0_f32;
    let mut paddle_half_width = 0.0_f32;
    let mut max_paddle_hp = 0.0_f32;
    let mut max_ammo = 0.0_f32;
    let mut coin_multiplier = 0.0_f32;
    let mut max_bombs = 0.0_f32;
    let mut bomb_radius = 0.0_f32;

    for def in catalog {
        let level = upgrades.get(&def.key).copied().unwrap_or(0);
        for (stat, effect) in def.effects {
            let amount = effect.apply(level);
            match stat {
                Stat::Lives => lives += amount,
                Stat::PaddleHalfWidth => paddle_half_width += amount,
                Stat::MaxPaddleHp => max_paddle_hp += amount,
                Stat::MaxAmmo => max_ammo += amount,
                Stat::CoinMultiplier => coin_multiplier += amount,
                Stat::MaxBombs => max_bombs += amount,
                Stat::BombRadius => bomb_radius += amount,
            }
        }
    }

    RunStats {
        lives: lives.round() as u32,
        paddle_half_width,
        max_paddle_hp: max_paddle_hp.round() as u32,
        max_ammo: max_ammo.round() as u32,
        coin_multiplier,
        max_bombs: max_bombs.round() as u32,
        bomb_radius,
    }
}
