//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies; storage is injected

pub mod collision;
pub mod events;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionPair, CollisionResult, Contact, ball_box_collision};
pub use events::{GameEvent, RunOutcome};
pub use state::{Ball, Bomb, Brick, Bullet, GamePhase, GameState, Paddle, RunState};
pub use tick::{TickInput, tick};
