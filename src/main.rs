//! Smashloop entry point
//!
//! The native build runs a headless session against the save file: it shows
//! the upgrade graph, spends coins on the cheapest affordable upgrade, then
//! lets an autopilot play one run and logs what happens.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Smashloop (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser front end drives the library directly
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use smashloop::consts::*;
    use smashloop::persistence::{FileStore, ProgressStore};
    use smashloop::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use smashloop::upgrades::UpgradeGraph;
    use smashloop::{Progress, Tuning, UpgradeNodeState, resolve};

    /// Five minutes of play at 60 Hz
    const MAX_FRAMES: u32 = 60 * 60 * 5;
    const DEFAULT_SAVE_PATH: &str = "smashloop-save.json";

    pub fn run() {
        let save_path = std::env::var_os("SMASHLOOP_SAVE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH));
        let tuning = std::env::var_os("SMASHLOOP_TUNING")
            .map(|path| Tuning::load(Path::new(&path)))
            .unwrap_or_default();
        let seed = std::env::var("SMASHLOOP_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(seed_from_clock);

        let mut store = FileStore::new(save_path);
        let graph = UpgradeGraph::standard();

        print_graph(&graph, &store.load());
        auto_buy(&graph, &mut store);

        let progress = store.load();
        let stats = resolve(&progress.upgrades);
        let mut state = match GameState::new(stats, progress.level, tuning, seed) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Saved level unusable ({e}), starting at level 1");
                match GameState::new(stats, 1, tuning, seed) {
                    Ok(state) => state,
                    Err(e) => {
                        log::error!("Could not start a run: {e}");
                        return;
                    }
                }
            }
        };
        log::info!("Game initialized with seed: {seed}");

        for frame in 0..MAX_FRAMES {
            let input = autopilot(&state, frame);
            for event in tick(&mut state, &input, FRAME_DT, &mut store) {
                report(&event);
            }
            if state.phase.is_terminal() {
                break;
            }
        }

        let summary = state.run_state();
        println!(
            "\nRun over: {:?} on level {}, score {}, {} coins earned",
            summary.phase, summary.level, summary.score, summary.coins_earned
        );
    }

    fn seed_from_clock() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn print_graph(graph: &UpgradeGraph, progress: &Progress) {
        println!("Coins: {}", progress.coins);
        for def in graph.defs() {
            let level = progress.level_of(def.key);
            let state = graph.node_state(progress, def.key);
            let cost = graph
                .next_cost(progress, def.key)
                .map_or_else(|| "-".to_string(), |c| c.to_string());
            println!(
                "  {:<16} {:>2}/{:<2} {:<10} next {:>5}  {}",
                def.name,
                level,
                def.max_level,
                format!("{state:?}"),
                cost,
                def.effect_label(level)
            );
        }
        for (source, target) in graph.edges() {
            println!("  {source} -> {target}: {:?}", graph.edge_state(progress, source, target));
        }
    }

    /// Buy the cheapest upgrade the balance covers, if any
    fn auto_buy(graph: &UpgradeGraph, store: &mut FileStore) {
        let progress = store.load();
        let cheapest = graph
            .defs()
            .iter()
            .filter(|def| {
                matches!(
                    graph.node_state(&progress, def.key),
                    UpgradeNodeState::Available | UpgradeNodeState::Unlocked
                )
            })
            .filter(|def| graph.can_afford(&progress, def.key))
            .filter_map(|def| graph.next_cost(&progress, def.key).map(|cost| (cost, def.key)))
            .min();

        match cheapest {
            Some((cost, key)) => match graph.purchase_and_save(store, key) {
                Ok(level) => println!("Bought {key} level {level} for {cost} coins"),
                Err(e) => log::warn!("Auto-buy of {key} failed: {e}"),
            },
            None => println!("Nothing affordable yet"),
        }
    }

    /// Paddle tracks where the ball is heading; fires whenever armed
    fn autopilot(state: &GameState, frame: u32) -> TickInput {
        let ball = &state.ball;
        // Lead the ball slightly and wobble so the bounce angle varies
        let wobble = (frame as f32 * 0.05).sin() * state.paddle.half_width * 0.5;
        let target_x = ball.pos.x + ball.vel.x * 0.05 + wobble;

        let playing = state.phase == GamePhase::Playing;
        TickInput {
            target_x: Some(target_x),
            launch: state.phase == GamePhase::Idle && frame % 30 == 0,
            fire_bullet: playing && state.ammo > 0 && frame % 20 == 0,
            throw_bomb: playing && state.bombs_left > 0 && frame % 180 == 0,
        }
    }

    fn report(event: &GameEvent) {
        match event {
            GameEvent::PaddleHit { .. } | GameEvent::BrickDestroyed { .. } => {
                log::debug!("{event:?}");
            }
            GameEvent::RunEnded {
                outcome,
                coins_earned,
                total_coins,
            } => {
                println!("{outcome:?}: +{coins_earned} coins, balance {total_coins}");
            }
            other => log::info!("{other:?}"),
        }
    }
}
