//! Smashloop - an arcade brick-breaker with persistent upgrades
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (paddle, ball, bricks, projectiles, run state)
//! - `level`: Brick shapes and field layout
//! - `upgrades`: Upgrade catalog and the prerequisite graph that prices purchases
//! - `stats`: Resolves upgrade levels into per-run stats
//! - `persistence`: Progress record and the stores that load/save it
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod level;
pub mod persistence;
pub mod sim;
pub mod stats;
pub mod tuning;
pub mod upgrades;

pub use error::{CatalogError, LevelError, ProgressError, PurchaseError, TuningError};
pub use persistence::{MemoryStore, Progress, ProgressStore};
pub use stats::{RunStats, resolve};
pub use tuning::Tuning;
pub use upgrades::{UpgradeGraph, UpgradeKey, UpgradeNodeState};

/// Game configuration constants
pub mod consts {
    /// Frame timestep used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Playfield dimensions (y grows downward)
    pub const FIELD_WIDTH: f32 = 1024.0;
    pub const FIELD_HEIGHT: f32 = 768.0;

    /// Paddle defaults
    pub const PADDLE_Y: f32 = FIELD_HEIGHT - 48.0;
    pub const PADDLE_HALF_HEIGHT: f32 = 10.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Ball rests this far above the paddle centre while idle
    pub const BALL_OFFSET_Y: f32 = 24.0;

    /// Brick grid metrics
    pub const BRICK_COLS: usize = 10;
    pub const BRICK_W: f32 = 80.0;
    pub const BRICK_H: f32 = 28.0;
    pub const BRICK_PAD: f32 = 8.0;
    /// Centre y of the first brick row
    pub const BRICK_TOP_Y: f32 = 60.0;

    /// Projectiles spawn this far above the paddle centre
    pub const PROJECTILE_SPAWN_OFFSET: f32 = 16.0;
    pub const BULLET_W: f32 = 4.0;
    pub const BULLET_H: f32 = 12.0;
    pub const BOMB_W: f32 = 24.0;
    pub const BOMB_H: f32 = 60.0;
    /// Projectiles above this y are culled
    pub const CULL_Y: f32 = -10.0;
}
