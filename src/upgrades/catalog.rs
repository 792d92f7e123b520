//! Static upgrade definitions
//!
//! Each upgrade prices itself geometrically and contributes to one or more
//! run stats. The numbers a run starts with come from here, not from the
//! stat resolver.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies an upgrade in the catalog and in saved progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeKey {
    PaddleHp,
    ExtraLives,
    PaddleWidth,
    Shooting,
    CoinMultiplier,
    Missile,
}

impl UpgradeKey {
    pub const ALL: [UpgradeKey; 6] = [
        UpgradeKey::PaddleHp,
        UpgradeKey::ExtraLives,
        UpgradeKey::PaddleWidth,
        UpgradeKey::Shooting,
        UpgradeKey::CoinMultiplier,
        UpgradeKey::Missile,
    ];

    /// Key as stored in the save record
    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKey::PaddleHp => "paddleHp",
            UpgradeKey::ExtraLives => "extraLives",
            UpgradeKey::PaddleWidth => "paddleWidth",
            UpgradeKey::Shooting => "shooting",
            UpgradeKey::CoinMultiplier => "coinMultiplier",
            UpgradeKey::Missile => "missile",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }
}

impl fmt::Display for UpgradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run stat an upgrade can contribute to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Lives,
    PaddleHalfWidth,
    MaxPaddleHp,
    MaxAmmo,
    CoinMultiplier,
    MaxBombs,
    BombRadius,
}

impl Stat {
    pub fn label(&self) -> &'static str {
        match self {
            Stat::Lives => "Lives",
            Stat::PaddleHalfWidth => "Paddle half-width",
            Stat::MaxPaddleHp => "Paddle HP",
            Stat::MaxAmmo => "Ammo",
            Stat::CoinMultiplier => "Coin multiplier",
            Stat::MaxBombs => "Bombs",
            Stat::BombRadius => "Blast radius",
        }
    }
}

/// How an upgrade level maps to a stat contribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// `base + per_level * level`, including at level 0
    Linear { base: f32, per_level: f32 },
    /// Zero until bought, then `base + per_level * level`
    Unlock { base: f32, per_level: f32 },
}

impl Effect {
    pub fn apply(&self, level: u32) -> f32 {
        match *self {
            Effect::Linear { base, per_level } => base + per_level * level as f32,
            Effect::Unlock { base, per_level } => {
                if level == 0 {
                    0.0
                } else {
                    base + per_level * level as f32
                }
            }
        }
    }
}

/// One purchasable node of the upgrade graph
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeDef {
    pub key: UpgradeKey,
    pub name: &'static str,
    pub description: &'static str,
    pub max_level: u32,
    pub base_cost: u64,
    /// Geometric price growth per level (> 1)
    pub cost_scale: f64,
    pub prerequisites: &'static [UpgradeKey],
    pub effects: &'static [(Stat, Effect)],
}

impl UpgradeDef {
    /// Human-readable summary of what this upgrade gives at `level`
    pub fn effect_label(&self, level: u32) -> String {
        if self.effects.iter().all(|(_, e)| e.apply(level) == 0.0) {
            return "Locked".to_string();
        }
        self.effects
            .iter()
            .map(|(stat, effect)| format!("{}: {}", stat.label(), effect.apply(level)))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// The built-in upgrade graph
pub const CATALOG: &[UpgradeDef] = &[
    UpgradeDef {
        key: UpgradeKey::PaddleHp,
        name: "Paddle HP",
        description: "Paddle takes more hits before breaking",
        max_level: 10,
        base_cost: 15,
        cost_scale: 1.5,
        prerequisites: &[],
        effects: &[(Stat::MaxPaddleHp, Effect::Linear { base: 5.0, per_level: 3.0 })],
    },
    UpgradeDef {
        key: UpgradeKey::ExtraLives,
        name: "Extra Lives",
        description: "Start with more lives",
        max_level: 3,
        base_cost: 50,
        cost_scale: 2.5,
        prerequisites: &[UpgradeKey::PaddleHp],
        effects: &[(Stat::Lives, Effect::Linear { base: 1.0, per_level: 1.0 })],
    },
    UpgradeDef {
        key: UpgradeKey::PaddleWidth,
        name: "Paddle Width",
        description: "Wider paddle to catch the ball",
        max_level: 5,
        base_cost: 20,
        cost_scale: 1.6,
        prerequisites: &[UpgradeKey::PaddleHp],
        effects: &[(Stat::PaddleHalfWidth, Effect::Linear { base: 40.0, per_level: 10.0 })],
    },
    UpgradeDef {
        key: UpgradeKey::Shooting,
        name: "Shooting",
        description: "Fire bullets from the paddle",
        max_level: 5,
        base_cost: 40,
        cost_scale: 1.5,
        prerequisites: &[UpgradeKey::PaddleWidth],
        effects: &[(Stat::MaxAmmo, Effect::Linear { base: 0.0, per_level: 4.0 })],
    },
    UpgradeDef {
        key: UpgradeKey::CoinMultiplier,
        name: "Coin Multiplier",
        description: "Earn more coins per brick",
        max_level: 10,
        base_cost: 25,
        cost_scale: 1.7,
        prerequisites: &[UpgradeKey::ExtraLives],
        effects: &[(Stat::CoinMultiplier, Effect::Linear { base: 1.0, per_level: 0.5 })],
    },
    UpgradeDef {
        key: UpgradeKey::Missile,
        name: "Missile",
        description: "Launch missiles that blast nearby bricks",
        max_level: 3,
        base_cost: 60,
        cost_scale: 1.8,
        prerequisites: &[UpgradeKey::Shooting, UpgradeKey::CoinMultiplier],
        effects: &[
            (Stat::MaxBombs, Effect::Unlock { base: 3.0, per_level: 0.0 }),
            (Stat::BombRadius, Effect::Unlock { base: 80.0, per_level: 20.0 }),
        ],
    },
];

/// Look up a definition in the built-in catalog
pub fn find(key: UpgradeKey) -> Option<&'static UpgradeDef> {
    CATALOG.iter().find(|def| def.key == key)
}
