//! Kill, pickup and milestone counters
//!
//! The same counter set is kept twice: once for the current run and once
//! across all runs. Every mutation goes through `StatsBook` so the two never
//! drift apart.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KEY_STATS, KeyValueStore};

/// Counter set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    pub total_kills: u64,
    pub death_count: u64,
    pub speed_pickups: u64,
    pub helper_pickups: u64,
    pub reloaded_once: bool,
    pub ran_out_of_ammo_once: bool,
    pub killed_special_once: bool,
    pub paralyzed_once: bool,
}

impl Stats {
    pub fn load(store: &impl KeyValueStore) -> Self {
        persistence::load_json(store, KEY_STATS).unwrap_or_default()
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        persistence::save_json(store, KEY_STATS, self);
    }
}

/// Persistent + per-run counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsBook {
    /// Survives across runs
    pub persistent: Stats,
    /// Reset at run start
    pub session: Stats,
    /// No damage taken this run
    pub flawless: bool,
    /// Persistent counters changed since the last save
    dirty: bool,
}

impl Default for StatsBook {
    fn default() -> Self {
        Self::new(Stats::default())
    }
}

impl StatsBook {
    pub fn new(persistent: Stats) -> Self {
        Self {
            persistent,
            session: Stats::default(),
            flawless: true,
            dirty: false,
        }
    }

    fn both(&mut self, f: impl Fn(&mut Stats)) {
        f(&mut self.persistent);
        f(&mut self.session);
        self.dirty = true;
    }

    pub fn record_kill(&mut self, special: bool) {
        self.both(|s| {
            s.total_kills += 1;
            if special {
                s.killed_special_once = true;
            }
        });
    }

    pub fn record_death(&mut self) {
        self.both(|s| s.death_count += 1);
    }

    pub fn record_speed_pickup(&mut self) {
        self.both(|s| s.speed_pickups += 1);
    }

    pub fn record_helper_pickup(&mut self) {
        self.both(|s| s.helper_pickups += 1);
    }

    pub fn record_reload(&mut self) {
        if !self.session.reloaded_once || !self.persistent.reloaded_once {
            self.both(|s| s.reloaded_once = true);
        }
    }

    /// Returns true the first time this run
    pub fn record_dry_fire(&mut self) -> bool {
        if self.session.ran_out_of_ammo_once {
            return false;
        }
        self.both(|s| s.ran_out_of_ammo_once = true);
        true
    }

    pub fn record_paralysis(&mut self) {
        self.both(|s| s.paralyzed_once = true);
    }

    pub fn record_damage(&mut self) {
        self.flawless = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Save persistent counters if anything changed
    pub fn flush(&mut self, store: &mut impl KeyValueStore) {
        if self.dirty {
            self.persistent.save(store);
            self.dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_counters_update_both_sets() {
        let mut persistent = Stats::default();
        persistent.total_kills = 40;
        let mut book = StatsBook::new(persistent);

        book.record_kill(false);
        book.record_kill(true);
        assert_eq!(book.persistent.total_kills, 42);
        assert_eq!(book.session.total_kills, 2);
        assert!(book.session.killed_special_once);
        assert!(book.persistent.killed_special_once);
    }

    #[test]
    fn test_dry_fire_marked_once() {
        let mut book = StatsBook::default();
        assert!(book.record_dry_fire());
        assert!(!book.record_dry_fire());
        assert!(book.persistent.ran_out_of_ammo_once);
    }

    #[test]
    fn test_flush_only_when_dirty() {
        let mut store = MemoryStore::new();
        let mut book = StatsBook::default();
        book.flush(&mut store);
        assert!(store.is_empty());

        book.record_speed_pickup();
        assert!(book.is_dirty());
        book.flush(&mut store);
        assert!(!book.is_dirty());
        assert_eq!(Stats::load(&store).speed_pickups, 1);
    }

    #[test]
    fn test_damage_clears_flawless() {
        let mut book = StatsBook::default();
        assert!(book.flawless);
        book.record_damage();
        assert!(!book.flawless);
    }
}
