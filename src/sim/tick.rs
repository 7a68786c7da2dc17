//! Frame simulation tick
//!
//! Core game loop step. Order within a tick:
//! deadlines -> input -> spawn -> move/collide -> pickups -> helper bot.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use super::{collision, effects, helper, spawn};
use crate::consts::MAX_FRAME_DT;
use crate::{frame_scale, secs_to_ms};

/// Input intent for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Trigger held
    pub fire: bool,
    /// Reload pressed (edge)
    pub reload: bool,
    /// Pause toggle (edge)
    pub pause: bool,
}

impl TickInput {
    /// Unnormalized movement direction; each axis is independent
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at {:.1}s", state.elapsed_secs());
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                log::info!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Running {
        return;
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.time_ms += secs_to_ms(dt);
    let scale = frame_scale(dt);

    effects::resolve_deadlines(state);

    effects::move_player(state, input.direction(), scale);
    if input.reload {
        effects::start_reload(state);
    }
    if input.fire {
        effects::try_shoot(state);
    }

    spawn::spawn_tick(state);

    collision::move_bullets(state, scale);
    collision::update_enemies(state, scale);
    if state.phase == GamePhase::GameOver {
        return;
    }
    collision::collect_powerups(state);

    helper::update_helper(state, scale);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Difficulty;
    use crate::sim::state::{Enemy, EnemyKind, GameEvent};
    use crate::stats::StatsBook;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    const FRAME: f32 = 1.0 / 60.0;

    /// A run with spawning disabled so scenarios control every entity
    fn quiet_state() -> GameState {
        let mut tuning = Tuning::default();
        tuning.enemy_spawn_chance = 0.0;
        tuning.powerup_spawn_chance = 0.0;
        GameState::new(42, Difficulty::Normal, tuning, StatsBook::default())
    }

    fn enemy(kind: EnemyKind, pos: Vec2, speed: f32) -> Enemy {
        Enemy {
            id: 100,
            kind,
            pos,
            radius: 12.0,
            speed,
            dir: 1.0,
        }
    }

    #[test]
    fn test_last_hit_ends_run() {
        let mut state = quiet_state();
        state.player.health = 1;
        state.score = 7;
        let pos = state.player.pos;
        state.enemies.push(enemy(EnemyKind::Medium, pos - Vec2::new(5.0, 0.0), 1.0));

        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.player.health, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::GameOver { score: 7, .. })));

        // Frozen afterwards
        let time = state.time_ms;
        state.enemies.push(enemy(EnemyKind::Weak, Vec2::new(100.0, 100.0), 1.0));
        tick(&mut state, &TickInput { fire: true, ..Default::default() }, FRAME);
        assert_eq!(state.score, 7);
        assert_eq!(state.time_ms, time);
        assert_eq!(state.enemies[0].pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_dry_fire_held() {
        let mut state = quiet_state();
        state.player.ammo = 0;
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut dry_events = 0;
        for _ in 0..30 {
            tick(&mut state, &fire, FRAME);
            dry_events += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::DryFire))
                .count();
        }
        assert!(state.bullets.is_empty());
        assert!(state.stats.session.ran_out_of_ammo_once);
        assert_eq!(dry_events, 1);
    }

    #[test]
    fn test_reload_scenario() {
        let mut state = quiet_state();
        state.player.ammo = 10;
        tick(
            &mut state,
            &TickInput {
                reload: true,
                ..Default::default()
            },
            FRAME,
        );
        assert!(state.player.reloading);
        assert_eq!(state.player.ammo, 10);

        // 900 ms reload at 100 ms per frame
        for _ in 0..8 {
            tick(&mut state, &TickInput::default(), 0.1);
            assert!(state.player.reloading);
            assert_eq!(state.player.ammo, 10);
        }
        tick(&mut state, &TickInput::default(), 0.1);
        assert!(!state.player.reloading);
        assert_eq!(state.player.ammo, 50);
    }

    #[test]
    fn test_special_breach_paralysis_scenario() {
        let mut state = quiet_state();
        state.enemies.push(Enemy {
            radius: 10.0,
            ..enemy(EnemyKind::Special, Vec2::new(FIELD_WIDTH + 9.0, 40.0), 2.0)
        });
        state.special_alive = true;

        tick(&mut state, &TickInput::default(), FRAME);
        assert!(state.enemies.is_empty());
        assert!(!state.special_alive);
        assert_eq!(state.player.health, state.player.max_health);
        assert!(state.hud().paralyzed);

        let held = TickInput {
            up: true,
            fire: true,
            ..Default::default()
        };
        let start = state.player.pos;
        // 2000 ms of paralysis from the first frame; stay inside it
        for _ in 0..19 {
            tick(&mut state, &held, 0.1);
        }
        assert_eq!(state.player.pos, start);
        assert!(state.bullets.is_empty());
        assert_eq!(state.player.ammo, 50);

        // Control returns once the deadline passes, with no extra input
        tick(&mut state, &held, 0.1);
        tick(&mut state, &held, 0.1);
        assert!(!state.hud().paralyzed);
        assert!(state.player.pos.y < start.y);
        assert!(!state.bullets.is_empty());
    }

    #[test]
    fn test_pause_stops_time() {
        let mut state = quiet_state();
        state.enemies.push(enemy(EnemyKind::Weak, Vec2::new(100.0, 100.0), 2.0));
        tick(&mut state, &TickInput::default(), FRAME);
        let time = state.time_ms;
        let x = state.enemies[0].pos.x;

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, FRAME);
        assert_eq!(state.phase, GamePhase::Paused);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 0.1);
        }
        assert_eq!(state.time_ms, time);
        assert_eq!(state.enemies[0].pos.x, x);

        // Unpausing simulates this frame only
        tick(&mut state, &pause, FRAME);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.enemies[0].pos.x > x);
    }

    #[test]
    fn test_movement_scales_with_frame_delta() {
        let mut state = quiet_state();
        let start = state.player.pos;
        let down = TickInput {
            down: true,
            ..Default::default()
        };
        tick(&mut state, &down, FRAME);
        assert!((state.player.pos.y - start.y - 3.2).abs() < 1e-3);

        let y = state.player.pos.y;
        tick(&mut state, &down, 2.0 * FRAME);
        assert!((state.player.pos.y - y - 6.4).abs() < 1e-3);

        // Oversized deltas are clamped
        let y = state.player.pos.y;
        tick(&mut state, &down, 5.0);
        assert!((state.player.pos.y - y - 3.2 * 6.0).abs() < 1e-2);
    }

    #[test]
    fn test_shot_kills_enemy() {
        let mut state = quiet_state();
        let muzzle = state.player.muzzle();
        state.enemies.push(Enemy {
            speed: 0.0,
            ..enemy(EnemyKind::Fast, muzzle - Vec2::new(60.0, 0.0), 0.0)
        });
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &fire, FRAME);
        }
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 1);
        assert_eq!(state.stats.session.total_kills, 1);
    }

    proptest! {
        #[test]
        fn prop_run_invariants(
            seed in any::<u64>(),
            frames in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()),
                1..300,
            ),
        ) {
            let mut tuning = Tuning::default();
            tuning.enemy_spawn_chance = 0.15;
            tuning.powerup_spawn_chance = 0.05;
            let mut state = GameState::new(seed, Difficulty::Hard, tuning, StatsBook::default());
            state.profile.special_enemy_chance = 0.5;

            let mut prev_score = 0;
            let mut prev_kills = 0;
            for (up, down, left, right, fire, reload) in frames {
                let input = TickInput { up, down, left, right, fire, reload, pause: false };
                tick(&mut state, &input, FRAME);

                prop_assert!(state.player.health <= state.player.max_health);
                prop_assert!(state.player.ammo <= state.player.magazine_size);
                prop_assert!(state.special_count() <= 1);
                prop_assert_eq!(state.special_alive, state.special_count() == 1);
                prop_assert!(state.score >= prev_score);
                prop_assert!(state.stats.session.total_kills >= prev_kills);
                prop_assert_eq!(state.player.is_dead(), state.phase == GamePhase::GameOver);
                prev_score = state.score;
                prev_kills = state.stats.session.total_kills;
            }
        }
    }
}
