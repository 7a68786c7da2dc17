//! Run settings and preferences
//!
//! Chosen on the start menu and persisted separately from progress.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KEY_SETTINGS, KeyValueStore};

/// Longest display name kept
pub const MAX_NAME_LEN: usize = 16;

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Start-of-run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Display name shown on the HUD and game-over screen
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            player_name: "Pilot".to_string(),
        }
    }
}

impl Settings {
    pub fn new(difficulty: Difficulty, player_name: &str) -> Self {
        let mut settings = Self {
            difficulty,
            ..Self::default()
        };
        settings.set_player_name(player_name);
        settings
    }

    /// Trim and cap the name; blank names keep the default
    pub fn set_player_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.player_name = Self::default().player_name;
        } else {
            self.player_name = name.chars().take(MAX_NAME_LEN).collect();
        }
    }

    pub fn load(store: &impl KeyValueStore) -> Self {
        match persistence::load_json(store, KEY_SETTINGS) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        persistence::save_json(store, KEY_SETTINGS, self);
        log::info!("Settings saved");
    }
}
