//! Player status effects and weapon handling
//!
//! Reload, fire gate, paralysis and speed boost are independent deadline
//! states compared against the run clock (`GameState::time_ms`). Nothing
//! here schedules callbacks: a deadline only takes effect when a tick
//! observes it.

use glam::Vec2;

use super::state::{Bullet, EnemyKind, GameEvent, GamePhase, GameState, HelperBot, PowerupKind};
use crate::consts::*;

/// Shake requested when the player takes a hit
pub const DAMAGE_SHAKE: f32 = 8.0;
/// Shake requested when the player is paralyzed
pub const PARALYSIS_SHAKE: f32 = 4.0;

/// Resolve deadlines that complete this tick
pub fn resolve_deadlines(state: &mut GameState) {
    let now = state.time_ms;
    let player = &mut state.player;
    if player.reloading && now >= player.reload_until {
        player.reloading = false;
        player.ammo = player.magazine_size;
        state.stats.record_reload();
        state.push_event(GameEvent::ReloadFinished);
    }
}

/// Begin a reload; no-op while reloading or with a full magazine
pub fn start_reload(state: &mut GameState) -> bool {
    let now = state.time_ms;
    let player = &mut state.player;
    if player.reloading || player.ammo >= player.magazine_size {
        return false;
    }
    player.reloading = true;
    player.reload_until = now + state.tuning.reload_ms;
    state.push_event(GameEvent::ReloadStarted);
    true
}

/// Fire one bullet if the weapon allows it
///
/// Blocked while paralyzed, reloading, or inside the fire interval. An
/// empty magazine fires nothing but marks the dry-fire stat the first
/// time.
pub fn try_shoot(state: &mut GameState) -> bool {
    let now = state.time_ms;
    let player = &state.player;
    if player.is_paralyzed(now) || player.reloading {
        return false;
    }
    if let Some(last) = player.last_shot_at {
        if now - last < state.tuning.fire_interval_ms {
            return false;
        }
    }
    if player.ammo == 0 {
        if state.stats.record_dry_fire() {
            state.push_event(GameEvent::DryFire);
        }
        return false;
    }

    let muzzle = player.muzzle();
    let vel = Vec2::new(player.facing() * state.tuning.bullet_speed, 0.0);
    state.player.ammo -= 1;
    state.player.last_shot_at = Some(now);
    state.bullets.push(Bullet {
        pos: muzzle,
        vel,
        radius: state.tuning.bullet_radius,
        from_helper: false,
    });
    true
}

/// Move the player from the held direction keys
///
/// Ignored entirely while paralyzed. The ship is kept inside the field.
pub fn move_player(state: &mut GameState, dir: Vec2, scale: f32) {
    let now = state.time_ms;
    if state.player.is_paralyzed(now) || dir == Vec2::ZERO {
        return;
    }
    let speed = state.player.speed(now, state.tuning.speed_boost_multiplier);
    let player = &mut state.player;
    let r = player.radius();
    player.pos += dir * speed * scale;
    player.pos = player.pos.clamp(
        Vec2::new(r, r),
        Vec2::new(FIELD_WIDTH - r, FIELD_HEIGHT - r),
    );
}

/// Effect of an enemy reaching the player (breach or ramming)
pub fn enemy_contact(state: &mut GameState, kind: EnemyKind) {
    if kind.is_special() {
        paralyze(state);
    } else {
        damage_player(state, 1);
    }
}

pub fn paralyze(state: &mut GameState) {
    let until = state.time_ms + state.tuning.paralysis_ms;
    state.player.paralyzed_until = state.player.paralyzed_until.max(until);
    state.stats.record_paralysis();
    state.push_event(GameEvent::Paralyzed {
        until: state.player.paralyzed_until,
    });
    state.push_event(GameEvent::Shake {
        intensity: PARALYSIS_SHAKE,
    });
}

/// Take damage; reaching zero health ends the run
pub fn damage_player(state: &mut GameState, amount: u8) {
    state.player.damage(amount);
    state.stats.record_damage();
    state.push_event(GameEvent::PlayerDamaged {
        health: state.player.health,
    });
    state.push_event(GameEvent::Shake {
        intensity: DAMAGE_SHAKE,
    });
    if state.player.is_dead() {
        end_run(state);
    }
}

/// Transition to game over (idempotent)
pub fn end_run(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.stats.record_death();
    log::info!(
        "Run over: score {} after {:.1}s",
        state.score,
        state.elapsed_secs()
    );
    state.push_event(GameEvent::GameOver {
        score: state.score,
        elapsed_secs: state.elapsed_secs(),
    });
}

/// Apply a collected powerup
pub fn apply_powerup(state: &mut GameState, kind: PowerupKind) {
    let now = state.time_ms;
    match kind {
        PowerupKind::SpeedBoost => {
            state.stats.record_speed_pickup();
            let from = state.player.speed_boost_until.max(now);
            state.player.speed_boost_until = from + state.tuning.speed_boost_ms;
        }
        PowerupKind::HelperBot => {
            state.stats.record_helper_pickup();
            let until = now + state.tuning.helper_duration_ms;
            match state.helper.as_mut() {
                Some(bot) => bot.active_until = bot.active_until.max(until),
                None => {
                    state.helper = Some(HelperBot {
                        pos: state.player.pos,
                        active_until: until,
                        last_shot_at: None,
                        shot_interval: state.tuning.helper_shot_interval_ms,
                    });
                }
            }
        }
    }
    log::debug!("Collected {:?}", kind);
    state.push_event(GameEvent::PowerupCollected { kind });
}
