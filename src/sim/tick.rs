//! Fixed timestep simulation tick
//!
//! Core game loop: apply input, integrate the ball in sub-steps, move
//! projectiles, and resolve every contact through one dispatch point.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;

use super::collision::{
    CollisionPair, Contact, ball_box_collision, paddle_bounce_direction, reflect_velocity,
};
use super::events::{GameEvent, RunOutcome};
use super::state::{Bomb, Bullet, GamePhase, GameState};
use crate::consts::*;
use crate::level::MAX_LEVEL;
use crate::persistence::ProgressStore;

/// Entity id used for the ball in contacts
const BALL_ID: u32 = 0;
/// Entity id used for the paddle in contacts
const PADDLE_ID: u32 = 0;

/// Maximum ball sub-steps per tick
const MAX_SUBSTEPS: usize = 32;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x the paddle follows
    pub target_x: Option<f32>,
    /// Launch ball (click/tap/space)
    pub launch: bool,
    /// Fire one bullet
    pub fire_bullet: bool,
    /// Throw one bomb
    pub throw_bomb: bool,
}

/// Advance the game state by one timestep, returning what happened
pub fn tick<S: ProgressStore + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    dt: f32,
    store: &mut S,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if !state.phase.is_terminal() {
        state.time += dt;

        if let Some(x) = input.target_x {
            state.paddle.move_to(x);
        }

        match state.phase {
            GamePhase::Idle => {
                state.ball.update_attached(&state.paddle);
                if input.launch {
                    launch_ball(state);
                }
            }
            GamePhase::Playing => {
                if input.fire_bullet {
                    fire_bullet(state);
                }
                if input.throw_bomb {
                    throw_bomb(state);
                }

                let mut resolved = HashSet::new();
                step_ball(state, dt, &mut resolved, &mut events);
                step_projectiles(state, dt, &mut resolved, &mut events);
                state.bricks.retain(|b| b.active);
            }
            GamePhase::GameOver | GamePhase::Win => {}
        }
    }

    if state.phase.is_terminal() {
        settle(state, store, &mut events);
    }

    events
}

fn launch_ball(state: &mut GameState) {
    let max = state.tuning.max_bounce_angle.abs();
    let angle = state.rng.random_range(-max..=max);
    state.ball.launch(angle, state.ball_speed);
    state.phase = GamePhase::Playing;
    log::debug!("Ball launched at {angle:.1} degrees");
}

fn fire_bullet(state: &mut GameState) {
    if state.ammo == 0 {
        return;
    }
    state.ammo -= 1;
    let id = state.next_entity_id();
    state.bullets.push(Bullet {
        id,
        pos: Vec2::new(state.paddle.x, PADDLE_Y - PROJECTILE_SPAWN_OFFSET),
        vy: -state.tuning.bullet_speed,
    });
    log::debug!("Bullet fired, {} left", state.ammo);
}

fn throw_bomb(state: &mut GameState) {
    if state.bombs_left == 0 {
        return;
    }
    state.bombs_left -= 1;
    let id = state.next_entity_id();
    state.bombs.push(Bomb {
        id,
        pos: Vec2::new(state.paddle.x, PADDLE_Y - PROJECTILE_SPAWN_OFFSET),
        vy: -state.tuning.bomb_initial_speed,
        accel: -state.tuning.bomb_accel,
    });
    log::debug!("Bomb thrown, {} left", state.bombs_left);
}

/// Move the ball in sub-steps no longer than half its radius
fn step_ball(
    state: &mut GameState,
    dt: f32,
    resolved: &mut HashSet<Contact>,
    events: &mut Vec<GameEvent>,
) {
    let travel = state.ball.speed() * dt;
    let num_steps = ((travel / (state.ball.radius * 0.5)).ceil() as usize).clamp(1, MAX_SUBSTEPS);
    let step_dt = dt / num_steps as f32;

    for _ in 0..num_steps {
        if state.phase != GamePhase::Playing {
            break;
        }

        let ball = &mut state.ball;
        ball.pos += ball.vel * step_dt;

        // Side and top walls reflect
        let r = ball.radius;
        if ball.pos.x - r < 0.0 {
            ball.pos.x = r;
            ball.vel.x = ball.vel.x.abs();
        } else if ball.pos.x + r > FIELD_WIDTH {
            ball.pos.x = FIELD_WIDTH - r;
            ball.vel.x = -ball.vel.x.abs();
        }
        if ball.pos.y - r < 0.0 {
            ball.pos.y = r;
            ball.vel.y = ball.vel.y.abs();
        }

        if state.paddle.is_collidable()
            && state.ball.vel.y > 0.0
            && ball_box_collision(state.ball.pos, r, &state.paddle.as_box()).hit
        {
            let contact = Contact {
                pair: CollisionPair::BallPaddle,
                source: BALL_ID,
                target: PADDLE_ID,
            };
            dispatch(state, contact, resolved, events);
        }

        let struck = state
            .bricks
            .iter()
            .filter(|b| b.active)
            .find(|b| ball_box_collision(state.ball.pos, r, &b.as_box()).hit)
            .map(|b| b.id);
        if let Some(brick_id) = struck {
            let contact = Contact {
                pair: CollisionPair::BallBrick,
                source: BALL_ID,
                target: brick_id,
            };
            dispatch(state, contact, resolved, events);
        }

        if state.phase == GamePhase::Playing && state.ball.pos.y + r >= FIELD_HEIGHT {
            lose_life(state, events);
        }
    }
}

/// Move bullets and bombs, resolve their hits, cull the ones off the top
fn step_projectiles(
    state: &mut GameState,
    dt: f32,
    resolved: &mut HashSet<Contact>,
    events: &mut Vec<GameEvent>,
) {
    for bullet in &mut state.bullets {
        bullet.pos.y += bullet.vy * dt;
    }
    for bomb in &mut state.bombs {
        bomb.vy += bomb.accel * dt;
        bomb.pos.y += bomb.vy * dt;
    }

    let bullet_ids: Vec<u32> = state.bullets.iter().map(|b| b.id).collect();
    for bullet_id in bullet_ids {
        if state.phase != GamePhase::Playing {
            break;
        }
        let Some(bullet) = state.bullets.iter().find(|b| b.id == bullet_id) else {
            continue;
        };
        let bx = bullet.as_box();
        let struck = state
            .bricks
            .iter()
            .find(|b| b.active && b.as_box().overlaps(&bx))
            .map(|b| b.id);
        if let Some(brick_id) = struck {
            let contact = Contact {
                pair: CollisionPair::BulletBrick,
                source: bullet_id,
                target: brick_id,
            };
            dispatch(state, contact, resolved, events);
        }
    }

    let bomb_ids: Vec<u32> = state.bombs.iter().map(|b| b.id).collect();
    for bomb_id in bomb_ids {
        if state.phase != GamePhase::Playing {
            break;
        }
        let Some(bomb) = state.bombs.iter().find(|b| b.id == bomb_id) else {
            continue;
        };
        let bx = bomb.as_box();
        let struck = state
            .bricks
            .iter()
            .find(|b| b.active && b.as_box().overlaps(&bx))
            .map(|b| b.id);
        if let Some(brick_id) = struck {
            let contact = Contact {
                pair: CollisionPair::BombBrick,
                source: bomb_id,
                target: brick_id,
            };
            dispatch(state, contact, resolved, events);
        }
    }

    state.bullets.retain(|b| b.pos.y >= CULL_Y);
    state.bombs.retain(|b| b.pos.y >= CULL_Y);
}

/// Route a contact to its handler; each contact resolves at most once per tick
fn dispatch(
    state: &mut GameState,
    contact: Contact,
    resolved: &mut HashSet<Contact>,
    events: &mut Vec<GameEvent>,
) {
    if state.phase != GamePhase::Playing || !resolved.insert(contact) {
        return;
    }
    match contact.pair {
        CollisionPair::BallPaddle => on_ball_paddle(state, events),
        CollisionPair::BallBrick => on_ball_brick(state, contact.target, events),
        CollisionPair::BulletBrick => on_bullet_brick(state, contact.source, contact.target, events),
        CollisionPair::BombBrick => on_bomb_brick(state, contact.source, contact.target, events),
    }
}

fn on_ball_paddle(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let offset = state.ball.pos.x - state.paddle.x;
    let speed = match state.ball.speed() {
        s if s > 0.0 => s,
        _ => state.ball_speed,
    };
    state.ball.vel = paddle_bounce_direction(offset, state.tuning.max_bounce_angle) * speed;

    let hit = ball_box_collision(state.ball.pos, state.ball.radius, &state.paddle.as_box());
    if hit.hit {
        if hit.normal.y < 0.0 {
            state.ball.pos.y = PADDLE_Y - PADDLE_HALF_HEIGHT - state.ball.radius;
        } else {
            state.ball.pos += hit.normal * hit.penetration;
        }
    }

    state.paddle.hp = state.paddle.hp.saturating_sub(1);
    if state.paddle.hp == 0 {
        state.paddle.broken = true;
        log::info!("Paddle broken");
        events.push(GameEvent::PaddleBroken);
    } else {
        events.push(GameEvent::PaddleHit { time: state.time });
    }
}

fn on_ball_brick(state: &mut GameState, brick_id: u32, events: &mut Vec<GameEvent>) {
    let Some(brick) = state.bricks.iter().find(|b| b.id == brick_id && b.active) else {
        return;
    };

    let hit = ball_box_collision(state.ball.pos, state.ball.radius, &brick.as_box());
    if hit.hit {
        if state.ball.vel.dot(hit.normal) < 0.0 {
            state.ball.vel = reflect_velocity(state.ball.vel, hit.normal);
        }
        state.ball.pos += hit.normal * hit.penetration;
    }

    let level = state.level;
    destroy_bricks(state, &[brick_id], events);

    // No ramp once the field has been replaced or the run is over
    if state.phase == GamePhase::Playing && state.level == level {
        state.ball_speed *= state.tuning.speed_multiplier;
        let current = state.ball.speed();
        if current > 0.0 {
            state.ball.vel *= state.ball_speed / current;
        }
    }
}

fn on_bullet_brick(state: &mut GameState, bullet_id: u32, brick_id: u32, events: &mut Vec<GameEvent>) {
    state.bullets.retain(|b| b.id != bullet_id);
    destroy_bricks(state, &[brick_id], events);
}

fn on_bomb_brick(state: &mut GameState, bomb_id: u32, brick_id: u32, events: &mut Vec<GameEvent>) {
    state.bombs.retain(|b| b.id != bomb_id);

    let Some(impact) = state.bricks.iter().find(|b| b.id == brick_id).map(|b| b.pos) else {
        return;
    };
    let radius = state.stats.bomb_radius;
    let caught: Vec<u32> = state
        .bricks
        .iter()
        .filter(|b| b.active && b.pos.distance(impact) < radius)
        .map(|b| b.id)
        .collect();
    log::debug!("Bomb blast at ({:.0}, {:.0}) caught {} bricks", impact.x, impact.y, caught.len());
    destroy_bricks(state, &caught, events);
}

/// The one path that removes bricks. Scores and pays for each, then checks
/// for a cleared field once for the whole batch.
fn destroy_bricks(state: &mut GameState, ids: &[u32], events: &mut Vec<GameEvent>) -> usize {
    let points = state.tuning.points_per_brick;
    let coins = (points as f32 * state.stats.coin_multiplier).floor() as u64;

    let mut destroyed = 0;
    for &id in ids {
        let Some(brick) = state.bricks.iter_mut().find(|b| b.id == id && b.active) else {
            continue;
        };
        brick.active = false;
        state.score += u64::from(points);
        state.coins_earned += coins;
        destroyed += 1;
        events.push(GameEvent::BrickDestroyed {
            x: brick.pos.x,
            y: brick.pos.y,
            tint: brick.tint,
            coins,
        });
    }

    if destroyed > 0 && state.active_brick_count() == 0 {
        level_cleared(state, events);
    }
    destroyed
}

fn level_cleared(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.level < MAX_LEVEL {
        let next_level = state.level + 1;
        log::info!("Level {} cleared, advancing to {next_level}", state.level);
        events.push(GameEvent::LevelCleared { next_level });
        state.start_level(next_level);
    } else {
        log::info!("Final level cleared");
        state.phase = GamePhase::Win;
        state.ball.stop();
    }
}

fn lose_life(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.lives = state.lives.saturating_sub(1);
    events.push(GameEvent::LifeLost {
        remaining: state.lives,
    });
    if state.lives > 0 {
        log::info!("Life lost, {} remaining", state.lives);
        state.reset_ball();
    } else {
        log::info!("Out of lives");
        state.phase = GamePhase::GameOver;
        state.ball.stop();
    }
}

/// Bank the run's coins. Runs once per run; storage failures are logged and
/// the run still ends.
fn settle<S: ProgressStore + ?Sized>(state: &mut GameState, store: &mut S, events: &mut Vec<GameEvent>) {
    if state.settled {
        return;
    }
    state.settled = true;

    let outcome = match state.phase {
        GamePhase::Win => RunOutcome::Win,
        _ => RunOutcome::GameOver,
    };
    let mut progress = store.load();
    progress.add_coins(state.coins_earned);
    if let Err(e) = store.save(&progress) {
        log::warn!("Failed to save progress after run: {e}");
    }
    log::info!(
        "Run ended ({outcome:?}): earned {} coins, balance {}",
        state.coins_earned,
        progress.coins
    );
    events.push(GameEvent::RunEnded {
        outcome,
        coins_earned: state.coins_earned,
        total_coins: progress.coins,
    });
}
