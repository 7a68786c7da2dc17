//! Loop driver
//!
//! Owns the run state, the store and the frame clock. The host calls
//! `frame` once per display frame with a wall-clock timestamp; everything
//! else (input setters, start/stop, menus) is plain method calls between
//! frames.

use crate::achievements::{AchievementRule, AchievementTracker, StatsSnapshot, Unlock};
use crate::highscores::HighScores;
use crate::persistence::{self, KEY_INTRO_SHOWN, KeyValueStore, PROGRESS_KEYS};
use crate::platform::FrameClock;
use crate::settings::{Difficulty, Settings};
use crate::sim::{GameEvent, GamePhase, GameState, Hud, TickInput, tick};
use crate::stats::{Stats, StatsBook};
use crate::tuning::Tuning;

/// Result of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub score: u64,
    pub elapsed_secs: f64,
    pub new_high_score: bool,
    pub new_best_time: bool,
}

/// Game instance holding all state
pub struct Game<S: KeyValueStore> {
    store: S,
    tuning: Tuning,
    settings: Settings,
    records: HighScores,
    achievements: AchievementTracker,
    /// Persistent counters between runs
    stats: Stats,
    state: Option<GameState>,
    /// Ticks are only processed while scheduled
    scheduled: bool,
    clock: FrameClock,
    input: TickInput,
    unlocks: Vec<Unlock>,
    last_run: Option<RunSummary>,
}

impl<S: KeyValueStore> Game<S> {
    /// Load everything persisted in `store`
    pub fn new(store: S, tuning: Tuning) -> Self {
        let settings = Settings::load(&store);
        let records = HighScores::load(&store);
        let achievements = AchievementTracker::load(&store, tuning.achievement_cooldown_ms);
        let stats = Stats::load(&store);
        Self {
            store,
            tuning,
            settings,
            records,
            achievements,
            stats,
            state: None,
            scheduled: false,
            clock: FrameClock::new(),
            input: TickInput::default(),
            unlocks: Vec::new(),
            last_run: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Change difficulty/name for the next run and remember them
    pub fn set_settings(&mut self, settings: Settings) {
        settings.save(&mut self.store);
        self.settings = settings;
    }

    /// Start a run with a random seed
    pub fn start(&mut self) {
        self.start_with_seed(rand::random());
    }

    /// Start a run, discarding anything left from the previous one
    pub fn start_with_seed(&mut self, seed: u64) {
        if self.scheduled {
            self.stop();
        }
        log::info!(
            "Starting run for {} on {}",
            self.settings.player_name,
            self.settings.difficulty.as_str()
        );
        self.state = Some(GameState::new(
            seed,
            self.settings.difficulty,
            self.tuning.clone(),
            StatsBook::new(self.stats.clone()),
        ));
        self.input = TickInput::default();
        self.unlocks.clear();
        self.clock.resync();
        self.scheduled = true;
    }

    /// Cancel the run (return to menu); no further ticks are processed
    pub fn stop(&mut self) {
        if !self.scheduled {
            return;
        }
        self.scheduled = false;
        self.clock.resync();
        log::info!("Run stopped");
        self.finish_run();
    }

    pub fn is_running(&self) -> bool {
        self.scheduled
    }

    /// Process one display frame; returns false once nothing is scheduled
    ///
    /// `now_ms` should be wall-clock time (`platform::now_ms`). Besides the
    /// frame delta it stamps repeat-achievement cooldowns, which are saved
    /// across sessions.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.scheduled {
            return false;
        }
        let Some(state) = self.state.as_mut() else {
            self.scheduled = false;
            return false;
        };

        if state.phase == GamePhase::Paused {
            // Suspended: only a pause toggle gets through, and time spent
            // here is never replayed
            self.clock.resync();
            if !self.input.pause {
                return true;
            }
        }
        let dt = self.clock.advance(now_ms);

        tick(state, &self.input, dt);

        // Clear one-shot inputs after processing
        self.input.reload = false;
        self.input.pause = false;

        if state.phase == GamePhase::Paused {
            self.clock.resync();
        } else {
            let snapshot = StatsSnapshot::capture(state);
            let fired = self.achievements.evaluate(&snapshot, now_ms, &mut self.store);
            self.unlocks.extend(fired);
        }
        state.stats.flush(&mut self.store);

        if state.phase == GamePhase::GameOver {
            self.scheduled = false;
            self.finish_run();
            return false;
        }
        true
    }

    /// Persist what the current run changed and build its summary
    fn finish_run(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.stats.flush(&mut self.store);
        self.stats = state.stats.persistent.clone();

        let outcome = self
            .records
            .record_run(state.score, state.elapsed_secs(), &mut self.store);
        self.last_run = Some(RunSummary {
            player_name: self.settings.player_name.clone(),
            difficulty: state.difficulty,
            score: state.score,
            elapsed_secs: state.elapsed_secs(),
            new_high_score: outcome.new_high_score,
            new_best_time: outcome.new_best_time,
        });
    }

    // === Input intent ===

    pub fn set_up(&mut self, held: bool) {
        self.input.up = held;
    }

    pub fn set_down(&mut self, held: bool) {
        self.input.down = held;
    }

    pub fn set_left(&mut self, held: bool) {
        self.input.left = held;
    }

    pub fn set_right(&mut self, held: bool) {
        self.input.right = held;
    }

    pub fn set_fire(&mut self, held: bool) {
        self.input.fire = held;
    }

    pub fn press_reload(&mut self) {
        self.input.reload = true;
    }

    pub fn press_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn input(&self) -> &TickInput {
        &self.input
    }

    // === Render/UI boundary ===

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    pub fn hud(&self) -> Option<Hud> {
        self.state.as_ref().map(GameState::hud)
    }

    /// Events generated by the most recent frame
    pub fn events(&self) -> &[GameEvent] {
        self.state.as_ref().map(|s| s.events.as_slice()).unwrap_or(&[])
    }

    /// Achievement popups queued since the last call
    pub fn drain_unlocks(&mut self) -> Vec<Unlock> {
        std::mem::take(&mut self.unlocks)
    }

    pub fn achievement_list(&self) -> Vec<(&'static AchievementRule, bool)> {
        self.achievements.list()
    }

    pub fn records(&self) -> HighScores {
        self.records
    }

    pub fn lifetime_stats(&self) -> &Stats {
        &self.stats
    }

    pub fn last_run(&self) -> Option<&RunSummary> {
        self.last_run.as_ref()
    }

    pub fn intro_shown(&self) -> bool {
        persistence::load_flag(&self.store, KEY_INTRO_SHOWN)
    }

    pub fn mark_intro_shown(&mut self) {
        persistence::save_flag(&mut self.store, KEY_INTRO_SHOWN, true);
    }

    /// Wipe records, stats, achievements and the intro flag
    pub fn reset_progress(&mut self) {
        self.stop();
        for key in PROGRESS_KEYS {
            self.store.remove(key);
        }
        self.records = HighScores::new();
        self.achievements.reset();
        self.stats = Stats::default();
        self.last_run = None;
        self.state = None;
        log::info!("Progress reset");
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{KEY_HIGH_SCORE, KEY_STATS, MemoryStore};
    use crate::sim::{Enemy, EnemyKind};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn quiet_tuning() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.enemy_spawn_chance = 0.0;
        tuning.powerup_spawn_chance = 0.0;
        tuning
    }

    fn game() -> Game<MemoryStore> {
        Game::new(MemoryStore::new(), quiet_tuning())
    }

    fn ram_player(game: &mut Game<MemoryStore>) {
        let state = game.state_mut().unwrap();
        let pos = state.player.pos;
        state.enemies.push(Enemy {
            id: 99,
            kind: EnemyKind::Weak,
            pos,
            radius: 12.0,
            speed: 0.0,
            dir: 1.0,
        });
    }

    #[test]
    fn test_death_updates_high_score() {
        let mut game = game();
        game.start_with_seed(1);
        game.frame(0.0);
        {
            let state = game.state_mut().unwrap();
            state.player.health = 1;
            state.score = 12;
        }
        ram_player(&mut game);

        assert!(!game.frame(FRAME_MS));
        assert!(!game.is_running());
        assert_eq!(game.hud().unwrap().phase, GamePhase::GameOver);
        assert_eq!(game.records().high_score, 12);
        assert_eq!(game.store().get(KEY_HIGH_SCORE).as_deref(), Some("12"));
        let summary = game.last_run().unwrap();
        assert!(summary.new_high_score);
        assert_eq!(summary.score, 12);
        assert_eq!(game.lifetime_stats().death_count, 1);

        // Nothing moves after the run ends
        assert!(!game.frame(FRAME_MS * 2.0));

        // A worse run leaves the record alone
        game.start_with_seed(2);
        game.state_mut().unwrap().player.health = 1;
        game.state_mut().unwrap().score = 3;
        ram_player(&mut game);
        game.frame(FRAME_MS * 3.0);
        assert_eq!(game.records().high_score, 12);
        assert!(!game.last_run().unwrap().new_high_score);
        assert_eq!(game.lifetime_stats().death_count, 2);
    }

    #[test]
    fn test_start_resets_run_state() {
        let mut game = game();
        game.start_with_seed(1);
        game.set_fire(true);
        for i in 0..10 {
            game.frame(i as f64 * FRAME_MS);
        }
        assert!(!game.state().unwrap().bullets.is_empty());

        game.stop();
        assert!(!game.frame(11.0 * FRAME_MS));

        game.start_with_seed(1);
        let state = game.state().unwrap();
        assert!(state.bullets.is_empty());
        assert_eq!(state.player.ammo, state.player.magazine_size);
        assert_eq!(state.time_ms, 0.0);
        assert!(!game.input().fire);
    }

    #[test]
    fn test_pause_resume_no_catch_up() {
        let mut game = game();
        game.start_with_seed(1);
        game.frame(0.0);
        game.frame(FRAME_MS);
        let time = game.state().unwrap().time_ms;

        game.press_pause();
        game.frame(2.0 * FRAME_MS);
        assert_eq!(game.hud().unwrap().phase, GamePhase::Paused);

        // Ten seconds pass while paused
        for i in 0..600 {
            assert!(game.frame(3.0 * FRAME_MS + i as f64 * FRAME_MS));
        }
        assert_eq!(game.state().unwrap().time_ms, time);

        game.press_pause();
        game.frame(20_000.0);
        assert_eq!(game.hud().unwrap().phase, GamePhase::Running);
        game.frame(20_000.0 + FRAME_MS);
        let resumed = game.state().unwrap().time_ms - time;
        assert!(resumed < 2.0 * FRAME_MS, "resumed with {}ms", resumed);
    }

    #[test]
    fn test_unlocks_persisted_and_queued() {
        let mut game = game();
        game.start_with_seed(1);
        game.state_mut().unwrap().stats.record_speed_pickup();
        game.frame(0.0);

        let unlocks = game.drain_unlocks();
        assert!(unlocks.iter().any(|u| u.id == "speed_demon"));
        assert!(game.drain_unlocks().is_empty());

        let reloaded = AchievementTracker::load(game.store(), 5000.0);
        assert!(reloaded.is_unlocked("speed_demon"));
        assert_eq!(Stats::load(game.store()).speed_pickups, 1);
    }

    #[test]
    fn test_reset_progress() {
        let mut game = game();
        game.mark_intro_shown();
        game.start_with_seed(1);
        game.state_mut().unwrap().stats.record_paralysis();
        game.frame(0.0);
        game.stop();
        assert!(game.intro_shown());
        assert!(game.store().get(KEY_STATS).is_some());

        game.reset_progress();
        assert!(!game.intro_shown());
        assert!(game.store().get(KEY_STATS).is_none());
        assert!(game.achievement_list().iter().all(|(_, unlocked)| !unlocked));
        assert_eq!(game.records(), HighScores::new());
    }

    #[test]
    fn test_settings_drive_next_run() {
        let mut game = game();
        game.set_settings(Settings::new(Difficulty::Hard, "Nova"));
        game.start_with_seed(9);
        let state = game.state().unwrap();
        assert_eq!(state.difficulty, Difficulty::Hard);
        assert_eq!(state.profile, quiet_tuning().hard);

        let game = Game::new(game.store().clone(), quiet_tuning());
        assert_eq!(game.settings().player_name, "Nova");
    }

    #[test]
    fn test_input_edges_consumed() {
        let mut game = game();
        game.start_with_seed(1);
        game.state_mut().unwrap().player.ammo = 3;
        game.press_reload();
        game.set_up(true);
        game.frame(0.0);
        assert!(!game.input().reload);
        assert!(game.input().up);
        assert!(game.hud().unwrap().reloading);
        let y = game.state().unwrap().player.pos.y;
        game.frame(FRAME_MS);
        assert!(game.state().unwrap().player.pos.y < y);
        assert!(!game.events().contains(&GameEvent::ReloadStarted));
    }
}
