//! Key-value persistence
//!
//! Features:
//! - One scalar or JSON value per key
//! - In-memory store (tests, headless runs)
//! - JSON file store (native)
//! - LocalStorage store (wasm32)
//! - Corrupt values read back as absent, never as faults

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

/// High score (integer)
pub const KEY_HIGH_SCORE: &str = "ns_highscore_v1";
/// Best survival time (integer seconds)
pub const KEY_BEST_TIME: &str = "ns_besttime_v1";
/// Achievement id -> unlocked
pub const KEY_ACHIEVEMENTS: &str = "ns_achievements_v1";
/// Achievement id -> last shown timestamp (ms)
pub const KEY_ACHIEVEMENTS_SHOWN: &str = "ns_achievements_shown_v1";
/// Persistent counters
pub const KEY_STATS: &str = "ns_stats_v1";
/// Intro sequence already played
pub const KEY_INTRO_SHOWN: &str = "ns_intro_shown_v1";
/// Difficulty and display name
pub const KEY_SETTINGS: &str = "ns_settings_v1";

/// Keys wiped by a progress reset (settings survive)
pub const PROGRESS_KEYS: [&str; 6] = [
    KEY_HIGH_SCORE,
    KEY_BEST_TIME,
    KEY_ACHIEVEMENTS,
    KEY_ACHIEVEMENTS_SHOWN,
    KEY_STATS,
    KEY_INTRO_SHOWN,
];

/// Opaque string store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Volatile store backed by a map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Read a JSON value; missing or malformed values are `None`
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding corrupt value for {}: {}", key, e);
            None
        }
    }
}

/// Write a JSON value
pub fn save_json<T: Serialize>(store: &mut impl KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, &json),
        Err(e) => log::warn!("Failed to serialize {}: {}", key, e),
    }
}

/// Read an integer; missing or non-numeric values are 0
pub fn load_u64(store: &impl KeyValueStore, key: &str) -> u64 {
    let Some(raw) = store.get(key) else {
        return 0;
    };
    match raw.trim().parse::<u64>() {
        Ok(value) => value,
        Err(_) => {
            log::warn!("Non-numeric value for {}: {:?}", key, raw);
            0
        }
    }
}

pub fn save_u64(store: &mut impl KeyValueStore, key: &str, value: u64) {
    store.set(key, &value.to_string());
}

/// Read a boolean flag; anything but `true` is false
pub fn load_flag(store: &impl KeyValueStore, key: &str) -> bool {
    load_json::<bool>(store, key).unwrap_or(false)
}

pub fn save_flag(store: &mut impl KeyValueStore, key: &str, value: bool) {
    store.set(key, if value { "true" } else { "false" });
}
