//! Frame simulation module
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Time comes in as a frame delta, never read from a clock
//! - Randomness comes from the state's own RNG
//! - Results leave through `GameState` fields and its event queue

pub mod collision;
pub mod effects;
pub mod helper;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, nearest_enemy, player_touches_enemy};
pub use state::{
    Bullet, Enemy, EnemyKind, GameEvent, GamePhase, GameState, HelperBot, Hud, Player, Powerup,
    PowerupKind,
};
pub use tick::{TickInput, tick};
