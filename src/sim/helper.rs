//! Helper bot behaviour

use glam::Vec2;

use super::collision::nearest_enemy;
use super::state::{Bullet, GameState};

/// Follow the player, fire at the nearest enemy, expire at the deadline
pub fn update_helper(state: &mut GameState, scale: f32) {
    let now = state.time_ms;
    let Some(bot) = state.helper.as_mut() else {
        return;
    };

    if now >= bot.active_until {
        log::debug!("Helper bot expired");
        state.helper = None;
        return;
    }

    // Exponential smoothing toward the hover point, frame-rate scaled
    let (ox, oy) = state.tuning.helper_offset;
    let target = state.player.pos + Vec2::new(ox, oy);
    let smoothing = state.tuning.helper_follow_smoothing.clamp(0.0, 1.0);
    let step = 1.0 - (1.0 - smoothing).powf(scale);
    bot.pos += (target - bot.pos) * step;

    let ready = bot
        .last_shot_at
        .is_none_or(|last| now - last >= bot.shot_interval);
    if !ready {
        return;
    }
    let Some(enemy) = nearest_enemy(bot.pos, &state.enemies) else {
        return;
    };
    let dir = (enemy.pos - bot.pos).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    bot.last_shot_at = Some(now);
    state.bullets.push(Bullet {
        pos: bot.pos,
        vel: dir * state.tuning.bullet_speed,
        radius: state.tuning.bullet_radius,
        from_helper: true,
    });
}
