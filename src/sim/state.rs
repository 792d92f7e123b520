//! Game state and core simulation types
//!
//! Everything one run needs lives in [`GameState`]; replacing it is a restart.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, direction_from_vertical};
use crate::consts::*;
use crate::error::LevelError;
use crate::level::{self, BrickPlacement};
use crate::stats::RunStats;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball resting on the paddle, waiting for launch input
    Idle,
    /// Active gameplay
    Playing,
    /// Out of lives
    GameOver,
    /// Last level cleared
    Win,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Win)
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Centre x
    pub x: f32,
    pub half_width: f32,
    pub hp: u32,
    pub max_hp: u32,
    /// Broken paddles stop colliding until the next reset
    pub broken: bool,
}

impl Paddle {
    pub fn new(stats: &RunStats) -> Self {
        Self {
            x: FIELD_WIDTH / 2.0,
            half_width: stats.paddle_half_width,
            hp: stats.max_paddle_hp,
            max_hp: stats.max_paddle_hp,
            broken: false,
        }
    }

    pub fn as_box(&self) -> Aabb {
        Aabb {
            center: Vec2::new(self.x, PADDLE_Y),
            half: Vec2::new(self.half_width, PADDLE_HALF_HEIGHT),
        }
    }

    pub fn is_collidable(&self) -> bool {
        !self.broken
    }

    /// Follow the pointer, keeping the paddle inside the field
    pub fn move_to(&mut self, target_x: f32) {
        let lo = self.half_width.min(FIELD_WIDTH / 2.0);
        self.x = target_x.clamp(lo, FIELD_WIDTH - lo);
    }

    pub fn restore(&mut self) {
        self.hp = self.max_hp;
        self.broken = false;
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(FIELD_WIDTH / 2.0, PADDLE_Y - BALL_OFFSET_Y),
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Keep the resting ball above the paddle centre
    pub fn update_attached(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.x, PADDLE_Y - BALL_OFFSET_Y);
    }

    /// Launch at `angle_deg` from vertical
    pub fn launch(&mut self, angle_deg: f32, speed: f32) {
        self.vel = direction_from_vertical(angle_deg) * speed;
    }

    pub fn stop(&mut self) {
        self.vel = Vec2::ZERO;
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub col: usize,
    pub row: usize,
    /// Centre
    pub pos: Vec2,
    pub tint: u32,
    pub active: bool,
}

impl Brick {
    pub fn from_placement(id: u32, placement: &BrickPlacement) -> Self {
        Self {
            id,
            col: placement.col,
            row: placement.row,
            pos: Vec2::new(placement.x, placement.y),
            tint: placement.tint,
            active: true,
        }
    }

    pub fn as_box(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(BRICK_W, BRICK_H))
    }
}

/// Straight-up shot from the paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vy: f32,
}

impl Bullet {
    pub fn as_box(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(BULLET_W, BULLET_H))
    }
}

/// Accelerating area-damage projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    pub pos: Vec2,
    pub vy: f32,
    /// Added to `vy` every second (negative is upward)
    pub accel: f32,
}

impl Bomb {
    pub fn as_box(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(BOMB_W, BOMB_H))
    }
}

/// HUD-facing snapshot of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub phase: GamePhase,
    pub level: u32,
    pub score: u64,
    pub coins_earned: u64,
    pub ball_speed: f32,
    pub ammo: u32,
    pub bombs: u32,
    pub lives: u32,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    pub stats: RunStats,
    pub tuning: Tuning,
    /// Launch-angle RNG
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Current level, 1-based
    pub level: u32,
    pub score: u64,
    /// Coins banked at settlement
    pub coins_earned: u64,
    /// Target ball speed; grows with every ball-brick hit
    pub ball_speed: f32,
    pub lives: u32,
    pub ammo: u32,
    /// Bombs left to throw
    pub bombs_left: u32,
    /// Simulation time in seconds
    pub time: f32,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub bullets: Vec<Bullet>,
    pub bombs: Vec<Bomb>,
    /// Set once the run's coins have been persisted
    pub settled: bool,
    next_id: u32,
}

impl GameState {
    /// Start a run at `level` with the given stats
    pub fn new(stats: RunStats, level: u32, tuning: Tuning, seed: u64) -> Result<Self, LevelError> {
        let level = level::check_level(level)?;
        let mut state = Self {
            stats,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            level,
            score: 0,
            coins_earned: 0,
            ball_speed: tuning.initial_ball_speed,
            lives: stats.lives,
            ammo: stats.max_ammo,
            bombs_left: stats.max_bombs,
            time: 0.0,
            paddle: Paddle::new(&stats),
            ball: Ball::new(),
            bricks: Vec::new(),
            bullets: Vec::new(),
            bombs: Vec::new(),
            settled: false,
            next_id: 1,
        };
        state.begin_run(stats, level);
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Start a fresh run, at the current level when `carry_level` is set
    pub fn restart(&mut self, stats: RunStats, carry_level: bool) {
        let level = if carry_level { self.level } else { 1 };
        self.begin_run(stats, level);
    }

    /// "Play again": a lost run resumes at its level, a won run starts over
    pub fn play_again(&mut self, stats: RunStats) {
        let carry = self.phase != GamePhase::Win;
        self.restart(stats, carry);
    }

    /// Developer shortcut to any level
    pub fn jump_to_level(&mut self, level: u32) -> Result<(), LevelError> {
        let level = level::check_level(level)?;
        if self.phase.is_terminal() {
            self.begin_run(self.stats, level);
        } else {
            self.start_level(level);
        }
        log::info!("Jumped to level {level}");
        Ok(())
    }

    pub fn active_brick_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    pub fn run_state(&self) -> RunState {
        RunState {
            phase: self.phase,
            level: self.level,
            score: self.score,
            coins_earned: self.coins_earned,
            ball_speed: self.ball_speed,
            ammo: self.ammo,
            bombs: self.bombs_left,
            lives: self.lives,
        }
    }

    fn begin_run(&mut self, stats: RunStats, level: u32) {
        self.stats = stats;
        self.lives = stats.lives;
        self.score = 0;
        self.coins_earned = 0;
        self.settled = false;
        self.paddle = Paddle::new(&stats);
        self.start_level(level);
        log::info!(
            "Run started at level {level}: {} lives, paddle hp {}, ammo {}, bombs {}",
            stats.lives,
            stats.max_paddle_hp,
            stats.max_ammo,
            stats.max_bombs
        );
    }

    /// Fresh field for `level`, refilled ammo and a reset ball.
    /// Callers validate `level` first.
    pub(crate) fn start_level(&mut self, level: u32) {
        self.level = level;
        self.bricks.clear();
        if let Ok(shape) = level::shape_for(level) {
            for placement in level::layout(shape, FIELD_WIDTH) {
                let id = self.next_entity_id();
                self.bricks.push(Brick::from_placement(id, &placement));
            }
        }
        self.ammo = self.stats.max_ammo;
        self.reset_ball();
    }

    /// Back to `Idle`: ball on the paddle at base speed, paddle repaired,
    /// bombs refilled, projectiles gone
    pub(crate) fn reset_ball(&mut self) {
        self.phase = GamePhase::Idle;
        self.ball_speed = self.tuning.initial_ball_speed;
        self.ball.stop();
        self.paddle.restore();
        self.ball.update_attached(&self.paddle);
        self.bombs_left = self.stats.max_bombs;
        self.bullets.clear();
        self.bombs.clear();
    }
}
