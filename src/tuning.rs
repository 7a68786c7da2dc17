//! Data-driven game balance
//!
//! Every gameplay number lives here so iterations can be compared by swapping
//! a JSON file instead of editing the simulation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::settings::Difficulty;

/// Per-difficulty spawn and speed scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DifficultyProfile {
    /// Multiplies the base per-frame spawn chances
    pub spawn_rate_multiplier: f32,
    /// Multiplies every enemy's speed
    pub enemy_speed_multiplier: f32,
    /// Width of the special-enemy slice of the type roll
    pub special_enemy_chance: f32,
}

impl DifficultyProfile {
    pub const EASY: Self = Self {
        spawn_rate_multiplier: 0.7,
        enemy_speed_multiplier: 0.85,
        special_enemy_chance: 0.02,
    };
    pub const NORMAL: Self = Self {
        spawn_rate_multiplier: 1.0,
        enemy_speed_multiplier: 1.0,
        special_enemy_chance: 0.05,
    };
    pub const HARD: Self = Self {
        spawn_rate_multiplier: 1.5,
        enemy_speed_multiplier: 1.3,
        special_enemy_chance: 0.08,
    };

    /// Built-in profile for a difficulty level
    pub fn for_level(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Normal => Self::NORMAL,
            Difficulty::Hard => Self::HARD,
        }
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Speed multipliers applied per enemy kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KindSpeeds {
    pub weak: f32,
    pub medium: f32,
    pub fast: f32,
    pub special: f32,
}

impl Default for KindSpeeds {
    fn default() -> Self {
        Self {
            weak: 0.8,
            medium: 1.0,
            fast: 1.5,
            special: 0.7,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    // === Player ===
    pub player_size: f32,
    /// Pixels per reference frame
    pub player_speed: f32,
    pub max_health: u8,

    // === Weapon ===
    pub magazine_size: u32,
    pub fire_interval_ms: f64,
    pub reload_ms: f64,
    pub bullet_speed: f32,
    pub bullet_radius: f32,

    // === Status effects ===
    pub paralysis_ms: f64,
    pub speed_boost_ms: f64,
    pub speed_boost_multiplier: f32,

    // === Helper bot ===
    pub helper_duration_ms: f64,
    pub helper_shot_interval_ms: f64,
    /// Fraction of the remaining distance covered per reference frame
    pub helper_follow_smoothing: f32,
    /// Offset from the player the bot hovers at (x, y)
    pub helper_offset: (f32, f32),

    // === Enemies ===
    pub enemy_min_size: f32,
    pub enemy_max_size: f32,
    pub enemy_speed_floor: f32,
    pub enemy_speed_jitter: f32,
    pub kind_speeds: KindSpeeds,
    /// Base per-frame spawn chance before difficulty scaling
    pub enemy_spawn_chance: f32,

    // === Powerups ===
    pub powerup_spawn_chance: f32,
    pub powerup_radius: f32,

    // === Scoring / achievements ===
    pub score_per_kill: u64,
    pub achievement_cooldown_ms: f64,

    // === Difficulty ===
    pub easy: DifficultyProfile,
    pub normal: DifficultyProfile,
    pub hard: DifficultyProfile,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 28.0,
            player_speed: 3.2,
            max_health: 10,

            magazine_size: 50,
            fire_interval_ms: 140.0,
            reload_ms: 900.0,
            bullet_speed: 8.0,
            bullet_radius: 4.0,

            paralysis_ms: 2000.0,
            speed_boost_ms: 5000.0,
            speed_boost_multiplier: 1.5,

            helper_duration_ms: 10_000.0,
            helper_shot_interval_ms: 450.0,
            helper_follow_smoothing: 0.1,
            helper_offset: (0.0, -40.0),

            enemy_min_size: 18.0,
            enemy_max_size: 36.0,
            enemy_speed_floor: 1.2,
            enemy_speed_jitter: 1.6,
            kind_speeds: KindSpeeds::default(),
            enemy_spawn_chance: 0.018,

            powerup_spawn_chance: 0.002,
            powerup_radius: 12.0,

            score_per_kill: 1,
            achievement_cooldown_ms: 5000.0,

            easy: DifficultyProfile::EASY,
            normal: DifficultyProfile::NORMAL,
            hard: DifficultyProfile::HARD,
        }
    }
}

impl Tuning {
    /// Profile for a difficulty level
    pub fn profile(&self, difficulty: Difficulty) -> DifficultyProfile {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        }
    }

    /// Parse a (possibly partial) tuning file, falling back to defaults
    ///
    /// A partial difficulty profile keeps its own level's values for the
    /// fields it leaves out.
    pub fn from_json(json: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(json).and_then(|mut value| {
            fill_profiles(&mut value);
            serde_json::from_value(value)
        });
        match parsed {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring malformed tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }
}

/// Lay each profile object found in `value` over its level's built-in profile
fn fill_profiles(value: &mut Value) {
    let Some(root) = value.as_object_mut() else {
        return;
    };
    for difficulty in Difficulty::ALL {
        let key = difficulty.as_str().to_lowercase();
        let Some(Value::Object(partial)) = root.get(&key) else {
            continue;
        };
        let Ok(Value::Object(mut full)) = serde_json::to_value(DifficultyProfile::for_level(difficulty))
        else {
            continue;
        };
        for (field, v) in partial {
            full.insert(field.clone(), v.clone());
        }
        root.insert(key, Value::Object(full));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_is_harder_than_normal() {
        let tuning = Tuning::default();
        let normal = tuning.profile(Difficulty::Normal);
        let hard = tuning.profile(Difficulty::Hard);
        assert!(hard.spawn_rate_multiplier > normal.spawn_rate_multiplier);
        assert!(hard.enemy_speed_multiplier > normal.enemy_speed_multiplier);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "speedBoostMultiplier": 2.0, "magazineSize": 20 }"#);
        assert_eq!(tuning.speed_boost_multiplier, 2.0);
        assert_eq!(tuning.magazine_size, 20);
        assert_eq!(tuning.max_health, 10);
        assert_eq!(tuning.hard, DifficultyProfile::HARD);
    }

    #[test]
    fn test_partial_profile_keeps_level_defaults() {
        let tuning = Tuning::from_json(
            r#"{ "magazineSize": 30, "hard": { "spawnRateMultiplier": 2.0 } }"#,
        );
        assert_eq!(tuning.magazine_size, 30);
        assert_eq!(tuning.hard.spawn_rate_multiplier, 2.0);
        assert_eq!(
            tuning.hard.enemy_speed_multiplier,
            DifficultyProfile::HARD.enemy_speed_multiplier
        );
        assert_eq!(
            tuning.hard.special_enemy_chance,
            DifficultyProfile::HARD.special_enemy_chance
        );
        assert_eq!(tuning.easy, DifficultyProfile::EASY);
    }

    #[test]
    fn test_partial_profile_deserializes_directly() {
        let profile: DifficultyProfile =
            serde_json::from_str(r#"{ "specialEnemyChance": 0.1 }"#).unwrap();
        assert_eq!(profile.special_enemy_chance, 0.1);
        assert_eq!(profile.spawn_rate_multiplier, 1.0);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert_eq!(Tuning::from_json("{ not json"), Tuning::default());
    }
}
