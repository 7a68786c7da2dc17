//! Neon Shooter headless entry point
//!
//! Plays one autopiloted run against a simulated 60 Hz display and logs the
//! outcome. Usage: `neon-shooter [easy|normal|hard] [name]`.
//!
//! Environment:
//! - `NEON_SHOOTER_SAVE`: JSON save file (in-memory store when unset)
//! - `NEON_SHOOTER_TUNING`: JSON tuning overrides
//! - `RUST_LOG`: log filter

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_shooter::highscores::format_duration;
    use neon_shooter::persistence::{FileStore, KeyValueStore, MemoryStore};
    use neon_shooter::sim::nearest_enemy;
    use neon_shooter::{Difficulty, Game, Settings, Tuning, platform};

    /// Five minutes of simulated frames
    const MAX_FRAMES: u32 = 60 * 60 * 5;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Vertical dead zone for the autopilot's tracking
    const AIM_SLACK: f32 = 4.0;

    pub fn run() {
        platform::init_logging();

        let mut args = std::env::args().skip(1);
        let difficulty = args
            .next()
            .and_then(|s| Difficulty::from_str(&s))
            .unwrap_or_default();
        let name = args.next().unwrap_or_default();
        let settings = Settings::new(difficulty, &name);

        let tuning = match std::env::var("NEON_SHOOTER_TUNING") {
            Ok(path) => match std::fs::read_to_string(&path) {
                Ok(json) => Tuning::from_json(&json),
                Err(e) => {
                    log::warn!("Cannot read tuning {}: {}", path, e);
                    Tuning::default()
                }
            },
            Err(_) => Tuning::default(),
        };

        match std::env::var("NEON_SHOOTER_SAVE") {
            Ok(path) => play(Game::new(FileStore::open(path), tuning), settings),
            Err(_) => play(Game::new(MemoryStore::new(), tuning), settings),
        }
    }

    fn play<S: KeyValueStore>(mut game: Game<S>, settings: Settings) {
        if !game.intro_shown() {
            log::info!("Incoming transmission: hold the line, pilot.");
            game.mark_intro_shown();
        }
        game.set_settings(settings);
        game.start();

        let mut now = platform::now_ms();
        for _ in 0..MAX_FRAMES {
            autopilot(&mut game);
            if !game.frame(now) {
                break;
            }
            for unlock in game.drain_unlocks() {
                log::info!("Achievement: {} - {}", unlock.title, unlock.description);
            }
            now += FRAME_MS;
        }
        game.stop();
        for unlock in game.drain_unlocks() {
            log::info!("Achievement: {} - {}", unlock.title, unlock.description);
        }

        if let Some(run) = game.last_run() {
            log::info!(
                "{} ({}) scored {} in {}",
                run.player_name,
                run.difficulty.as_str(),
                run.score,
                format_duration(run.elapsed_secs as u64)
            );
        }
        let records = game.records();
        log::info!(
            "High score {} | best time {}",
            records.high_score,
            format_duration(records.best_time_secs)
        );
        let unlocked = game.achievement_list().iter().filter(|(_, u)| *u).count();
        log::info!("Achievements: {}/{}", unlocked, game.achievement_list().len());
    }

    /// Line up with the closest enemy and keep the trigger down
    fn autopilot<S: KeyValueStore>(game: &mut Game<S>) {
        let Some(state) = game.state() else {
            return;
        };
        let player = &state.player;
        let target_y = nearest_enemy(player.pos, &state.enemies).map(|e| e.pos.y);
        let (up, down) = match target_y {
            Some(y) if y < player.pos.y - AIM_SLACK => (true, false),
            Some(y) if y > player.pos.y + AIM_SLACK => (false, true),
            _ => (false, false),
        };
        let empty = player.ammo == 0 && !player.reloading;

        game.set_up(up);
        game.set_down(down);
        game.set_fire(target_y.is_some());
        if empty {
            game.press_reload();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds drive `neon_shooter::Game` from the host page
}
