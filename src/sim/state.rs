//! Game state and core simulation types
//!
//! The entity registry: everything a tick reads or mutates lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Difficulty;
use crate::stats::StatsBook;
use crate::tuning::{DifficultyProfile, Tuning};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// No ticks are simulated until unpaused
    Paused,
    /// Run ended, score frozen
    GameOver,
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Weak,
    Medium,
    Fast,
    /// Paralyzes instead of damaging; at most one alive
    Special,
}

impl EnemyKind {
    /// RGB color handed to the renderer with impact events
    pub fn color(&self) -> u32 {
        match self {
            EnemyKind::Weak => 0xff4d4d,
            EnemyKind::Medium => 0xff9f1c,
            EnemyKind::Fast => 0xffd34d,
            EnemyKind::Special => 0x1a1a1a,
        }
    }

    pub fn is_special(&self) -> bool {
        *self == EnemyKind::Special
    }
}

/// Player ship color
pub const PLAYER_COLOR: u32 = 0x00d8ff;

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Bounding size (diameter for collision purposes)
    pub size: f32,
    /// Pixels per reference frame
    pub base_speed: f32,
    pub health: u8,
    pub max_health: u8,
    pub ammo: u32,
    pub magazine_size: u32,
    pub reloading: bool,
    /// Run-clock ms at which the reload in flight completes
    pub reload_until: f64,
    pub last_shot_at: Option<f64>,
    pub paralyzed_until: f64,
    pub speed_boost_until: f64,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(FIELD_WIDTH - PLAYER_START_INSET, FIELD_HEIGHT / 2.0),
            size: tuning.player_size,
            base_speed: tuning.player_speed,
            health: tuning.max_health,
            max_health: tuning.max_health,
            ammo: tuning.magazine_size,
            magazine_size: tuning.magazine_size,
            reloading: false,
            reload_until: 0.0,
            last_shot_at: None,
            paralyzed_until: 0.0,
            speed_boost_until: 0.0,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn is_paralyzed(&self, now: f64) -> bool {
        now < self.paralyzed_until
    }

    pub fn is_boosted(&self, now: f64) -> bool {
        now < self.speed_boost_until
    }

    /// Effective speed in pixels per reference frame
    pub fn speed(&self, now: f64, boost_multiplier: f32) -> f32 {
        if self.is_boosted(now) {
            self.base_speed * boost_multiplier
        } else {
            self.base_speed
        }
    }

    /// Milliseconds left on the reload in flight (0 when idle)
    pub fn reload_remaining(&self, now: f64) -> f64 {
        if self.reloading {
            (self.reload_until - now).max(0.0)
        } else {
            0.0
        }
    }

    /// Horizontal direction the ship fires in: toward the far half
    pub fn facing(&self) -> f32 {
        if self.pos.x >= FIELD_WIDTH / 2.0 { -1.0 } else { 1.0 }
    }

    /// Bullet spawn point at the nose of the ship
    pub fn muzzle(&self) -> Vec2 {
        self.pos + Vec2::new(self.facing() * self.radius(), 0.0)
    }

    /// Apply damage, clamping at zero
    pub fn damage(&mut self, amount: u8) {
        self.health = self.health.saturating_sub(amount);
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Pixels per reference frame
    pub vel: Vec2,
    pub radius: f32,
    /// Fired by the helper bot rather than the player
    #[serde(default)]
    pub from_helper: bool,
}

/// An enemy crossing the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per reference frame
    pub speed: f32,
    /// +1 moves right, -1 moves left
    pub dir: f32,
}

impl Enemy {
    /// Fully past the far edge of its lane
    pub fn has_breached(&self) -> bool {
        if self.dir > 0.0 {
            self.pos.x - self.radius > FIELD_WIDTH
        } else {
            self.pos.x + self.radius < 0.0
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    SpeedBoost,
    HelperBot,
}

/// A pickup sitting on the field until collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub radius: f32,
}

/// Temporary wingman
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperBot {
    pub pos: Vec2,
    pub active_until: f64,
    pub last_shot_at: Option<f64>,
    pub shot_interval: f64,
}

/// Events produced during a tick (drained by the renderer/UI)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Particle burst request
    Impact { pos: Vec2, color: u32, count: u32 },
    /// Screen shake request
    Shake { intensity: f32 },
    EnemyKilled { kind: EnemyKind, pos: Vec2 },
    /// Enemy crossed the far boundary
    Breach { kind: EnemyKind },
    PlayerDamaged { health: u8 },
    Paralyzed { until: f64 },
    PowerupCollected { kind: PowerupKind },
    ReloadStarted,
    ReloadFinished,
    /// Trigger pulled on an empty magazine (first time this run)
    DryFire,
    GameOver { score: u64, elapsed_secs: f64 },
}

/// Read-only HUD view for the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub health: u8,
    pub max_health: u8,
    pub ammo: u32,
    pub magazine_size: u32,
    pub reloading: bool,
    pub reload_remaining_ms: f64,
    pub paralyzed: bool,
    pub speed_boosted: bool,
    pub helper_active: bool,
    pub elapsed_secs: f64,
    pub phase: GamePhase,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub profile: DifficultyProfile,
    pub tuning: Tuning,
    /// Run clock: active (unpaused) milliseconds since start
    pub time_ms: f64,
    pub score: u64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<Powerup>,
    pub helper: Option<HelperBot>,
    /// Special-enemy singleton flag
    pub special_alive: bool,
    pub stats: StatsBook,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run
    pub fn new(seed: u64, difficulty: Difficulty, tuning: Tuning, stats: StatsBook) -> Self {
        Self {
            phase: GamePhase::Running,
            difficulty,
            profile: tuning.profile(difficulty),
            player: Player::new(&tuning),
            tuning,
            time_ms: 0.0,
            score: 0,
            bullets: Vec::new(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            helper: None,
            special_alive: false,
            stats,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.time_ms / 1000.0
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn hud(&self) -> Hud {
        let now = self.time_ms;
        Hud {
            score: self.score,
            health: self.player.health,
            max_health: self.player.max_health,
            ammo: self.player.ammo,
            magazine_size: self.player.magazine_size,
            reloading: self.player.reloading,
            reload_remaining_ms: self.player.reload_remaining(now),
            paralyzed: self.player.is_paralyzed(now),
            speed_boosted: self.player.is_boosted(now),
            helper_active: self.helper.is_some(),
            elapsed_secs: self.elapsed_secs(),
            phase: self.phase,
        }
    }

    /// Special enemies currently in the registry
    pub fn special_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.kind.is_special()).count()
    }
}
