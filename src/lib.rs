//! Neon Shooter - a lane shooter simulation core
//!
//! Core modules:
//! - `sim`: Frame simulation (spawning, movement, collisions, status effects)
//! - `achievements`: Declarative achievement rules and unlock tracking
//! - `persistence`: Key-value store abstraction (memory, file, LocalStorage)
//! - `platform`: Browser/native logging and clock
//! - `tuning`: Data-driven game balance
//! - `game`: Loop driver tying the simulation to the store

pub mod achievements;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod stats;
pub mod tuning;

pub use achievements::{AchievementTracker, StatsSnapshot, Unlock};
pub use game::Game;
pub use highscores::HighScores;
pub use settings::{Difficulty, Settings};
pub use stats::{Stats, StatsBook};
pub use tuning::{DifficultyProfile, Tuning};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 900.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Entity speeds are expressed in pixels per frame at this rate
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Largest frame delta a single tick will simulate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Bullets survive this far past the playfield edge
    pub const BULLET_BOUNDS_MARGIN: f32 = 10.0;
    /// Enemies spawn this far beyond the edge (plus their radius)
    pub const ENEMY_SPAWN_OFFSET: f32 = 6.0;
    /// Vertical margin for enemy spawn positions
    pub const ENEMY_SPAWN_MARGIN: f32 = 20.0;
    /// Powerups never spawn closer than this to a wall
    pub const POWERUP_SPAWN_INSET: f32 = 40.0;
    /// Player starts this far from the right wall
    pub const PLAYER_START_INSET: f32 = 80.0;
    /// Forgiveness subtracted from player/enemy contact distance
    pub const CONTACT_TOLERANCE: f32 = 2.0;
}

/// Convert a frame delta (seconds) into reference-frame units
#[inline]
pub fn frame_scale(dt: f32) -> f32 {
    dt * consts::REFERENCE_FPS
}

/// Seconds to milliseconds for run-clock arithmetic
#[inline]
pub fn secs_to_ms(dt: f32) -> f64 {
    dt as f64 * 1000.0
}
