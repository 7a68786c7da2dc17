//! Per-frame probabilistic spawning
//!
//! One uniform roll per entity class per frame, scaled by the difficulty
//! profile's spawn multiplier.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, GameState, Powerup, PowerupKind};
use crate::consts::*;
use crate::tuning::{DifficultyProfile, KindSpeeds};

/// Map a uniform roll in [0, 1) to an enemy kind
///
/// The low slice of width `special_chance` is reserved for the special
/// enemy while none is alive; otherwise the fixed cut points apply.
pub fn pick_enemy_kind(roll: f32, special_chance: f32, special_alive: bool) -> EnemyKind {
    if !special_alive && roll < special_chance {
        EnemyKind::Special
    } else if roll < 0.30 {
        EnemyKind::Fast
    } else if roll < 0.65 {
        EnemyKind::Medium
    } else {
        EnemyKind::Weak
    }
}

fn kind_multiplier(kind: EnemyKind, speeds: &KindSpeeds) -> f32 {
    match kind {
        EnemyKind::Weak => speeds.weak,
        EnemyKind::Medium => speeds.medium,
        EnemyKind::Fast => speeds.fast,
        EnemyKind::Special => speeds.special,
    }
}

/// Enemy speed in pixels per reference frame
pub fn enemy_speed(
    base_floor: f32,
    jitter: f32,
    profile: &DifficultyProfile,
    kind: EnemyKind,
    speeds: &KindSpeeds,
) -> f32 {
    (base_floor + jitter) * profile.enemy_speed_multiplier * kind_multiplier(kind, speeds)
}

/// Roll for this frame's spawns
pub fn spawn_tick(state: &mut GameState) {
    let enemy_chance = state.profile.spawn_rate_multiplier * state.tuning.enemy_spawn_chance;
    if state.rng.random::<f32>() < enemy_chance {
        spawn_enemy(state);
    }

    let powerup_chance = state.profile.spawn_rate_multiplier * state.tuning.powerup_spawn_chance;
    if state.rng.random::<f32>() < powerup_chance {
        spawn_powerup(state);
    }
}

/// Spawn one enemy on the edge opposite the player
pub fn spawn_enemy(state: &mut GameState) {
    let tuning = &state.tuning;
    let size_span = (tuning.enemy_max_size - tuning.enemy_min_size).max(0.0);
    let size = tuning.enemy_min_size + state.rng.random::<f32>() * size_span;
    let radius = size / 2.0;

    let kind_roll = state.rng.random::<f32>();
    let kind = pick_enemy_kind(kind_roll, state.profile.special_enemy_chance, state.special_alive);

    let jitter = state.rng.random::<f32>() * tuning.enemy_speed_jitter;
    let speed = enemy_speed(
        tuning.enemy_speed_floor,
        jitter,
        &state.profile,
        kind,
        &tuning.kind_speeds,
    );

    // Travel toward the player's half
    let dir = -state.player.facing();
    let x = if dir > 0.0 {
        -radius - ENEMY_SPAWN_OFFSET
    } else {
        FIELD_WIDTH + radius + ENEMY_SPAWN_OFFSET
    };
    let y = ENEMY_SPAWN_MARGIN + state.rng.random::<f32>() * (FIELD_HEIGHT - 2.0 * ENEMY_SPAWN_MARGIN);

    if kind.is_special() {
        state.special_alive = true;
    }

    let id = state.next_entity_id();
    log::debug!("Spawned {:?} enemy #{} speed {:.2}", kind, id, speed);
    state.enemies.push(Enemy {
        id,
        kind,
        pos: Vec2::new(x, y),
        radius,
        speed,
        dir,
    });
}

/// Spawn one powerup inset from the walls
pub fn spawn_powerup(state: &mut GameState) {
    let kind = if state.rng.random_bool(0.5) {
        PowerupKind::SpeedBoost
    } else {
        PowerupKind::HelperBot
    };
    let x = POWERUP_SPAWN_INSET + state.rng.random::<f32>() * (FIELD_WIDTH - 2.0 * POWERUP_SPAWN_INSET);
    let y = POWERUP_SPAWN_INSET + state.rng.random::<f32>() * (FIELD_HEIGHT - 2.0 * POWERUP_SPAWN_INSET);

    let id = state.next_entity_id();
    log::debug!("Spawned {:?} powerup #{}", kind, id);
    state.powerups.push(Powerup {
        id,
        kind,
        pos: Vec2::new(x, y),
        radius: state.tuning.powerup_radius,
    });
}
