//! Events emitted by the simulation for the presentation layer.
//!
//! The presentation reacts to these (sparks, shakes, HUD updates) and never
//! feeds anything back except input.

use serde::{Deserialize, Serialize};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Win,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Ball bounced off an intact paddle (simulation time in seconds)
    PaddleHit { time: f32 },
    /// A brick was destroyed by ball, bullet or blast
    BrickDestroyed { x: f32, y: f32, tint: u32, coins: u64 },
    /// Paddle HP ran out; the paddle is gone until the next reset
    PaddleBroken,
    /// Ball left through the bottom
    LifeLost { remaining: u32 },
    /// Field cleared, moving on
    LevelCleared { next_level: u32 },
    /// Run settled; `total_coins` is the persisted balance afterwards
    RunEnded {
        outcome: RunOutcome,
        coins_earned: u64,
        total_coins: u64,
    },
}
