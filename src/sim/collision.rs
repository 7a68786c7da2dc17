//! Movement and collision resolution
//!
//! All shapes are circles. Collections are walked back to front so an
//! element can be removed without disturbing the ones not yet visited.

use glam::Vec2;

use super::effects;
use super::state::{Enemy, GameEvent, GamePhase, GameState, Player};
use crate::consts::*;

/// Particles requested when an enemy is shot down
pub const KILL_PARTICLES: u32 = 12;
/// Particles requested when an enemy rams the player
pub const CONTACT_PARTICLES: u32 = 20;

/// Strict circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Player/enemy contact, slightly forgiving
pub fn player_touches_enemy(player: &Player, enemy: &Enemy) -> bool {
    enemy.pos.distance(player.pos) < enemy.radius + player.radius() - CONTACT_TOLERANCE
}

/// Outside the playfield plus the bullet margin
pub fn out_of_bounds(pos: Vec2) -> bool {
    pos.x < -BULLET_BOUNDS_MARGIN
        || pos.x > FIELD_WIDTH + BULLET_BOUNDS_MARGIN
        || pos.y < -BULLET_BOUNDS_MARGIN
        || pos.y > FIELD_HEIGHT + BULLET_BOUNDS_MARGIN
}

/// Closest enemy to `from`; on equal distance the earlier enemy wins
pub fn nearest_enemy(from: Vec2, enemies: &[Enemy]) -> Option<&Enemy> {
    enemies.iter().fold(None, |best: Option<&Enemy>, enemy| match best {
        Some(current) if current.pos.distance_squared(from) <= enemy.pos.distance_squared(from) => {
            Some(current)
        }
        _ => Some(enemy),
    })
}

/// Advance bullets and drop the ones that left the field
pub fn move_bullets(state: &mut GameState, scale: f32) {
    for i in (0..state.bullets.len()).rev() {
        let bullet = &mut state.bullets[i];
        bullet.pos += bullet.vel * scale;
        if out_of_bounds(bullet.pos) {
            state.bullets.remove(i);
        }
    }
}

/// Clear the singleton flag when the special enemy leaves the registry
fn release(state: &mut GameState, enemy: &Enemy) {
    if enemy.kind.is_special() {
        state.special_alive = false;
    }
}

/// Advance enemies and resolve breach, ramming and bullet hits
///
/// Per enemy, in order: breach, player contact, newest overlapping bullet (scanned from the back).
/// Stops as soon as the run ends.
pub fn update_enemies(state: &mut GameState, scale: f32) {
    for i in (0..state.enemies.len()).rev() {
        {
            let enemy = &mut state.enemies[i];
            enemy.pos.x += enemy.speed * enemy.dir * scale;
        }

        if state.enemies[i].has_breached() {
            let enemy = state.enemies.remove(i);
            release(state, &enemy);
            state.push_event(GameEvent::Breach { kind: enemy.kind });
            effects::enemy_contact(state, enemy.kind);
            if state.phase == GamePhase::GameOver {
                return;
            }
            continue;
        }

        if player_touches_enemy(&state.player, &state.enemies[i]) {
            let enemy = state.enemies.remove(i);
            release(state, &enemy);
            state.push_event(GameEvent::Impact {
                pos: enemy.pos,
                color: enemy.kind.color(),
                count: CONTACT_PARTICLES,
            });
            effects::enemy_contact(state, enemy.kind);
            if state.phase == GamePhase::GameOver {
                return;
            }
            continue;
        }

        let hit = {
            let enemy = &state.enemies[i];
            state
                .bullets
                .iter()
                .rposition(|b| circles_overlap(b.pos, b.radius, enemy.pos, enemy.radius))
        };
        if let Some(j) = hit {
            state.bullets.remove(j);
            let enemy = state.enemies.remove(i);
            release(state, &enemy);
            state.score += state.tuning.score_per_kill;
            state.stats.record_kill(enemy.kind.is_special());
            state.push_event(GameEvent::Impact {
                pos: enemy.pos,
                color: enemy.kind.color(),
                count: KILL_PARTICLES,
            });
            state.push_event(GameEvent::EnemyKilled {
                kind: enemy.kind,
                pos: enemy.pos,
            });
        }
    }
}

/// Pick up every powerup the player overlaps
pub fn collect_powerups(state: &mut GameState) {
    for i in (0..state.powerups.len()).rev() {
        let p = &state.powerups[i];
        if circles_overlap(p.pos, p.radius, state.player.pos, state.player.radius()) {
            let powerup = state.powerups.remove(i);
            effects::apply_powerup(state, powerup.kind);
        }
    }
}
