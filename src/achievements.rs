//! Achievement rules and unlock tracking
//!
//! Rules are plain data: an id, display text, a category, whether the unlock
//! is permanent, and a predicate over a `StatsSnapshot`. The tracker checks
//! the whole table against one snapshot per frame, so stat changes made
//! later in the same frame can never be half-observed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KEY_ACHIEVEMENTS, KEY_ACHIEVEMENTS_SHOWN, KeyValueStore};
use crate::sim::GameState;
use crate::stats::Stats;

/// Grouping used by the achievements menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Combat,
    Score,
    Survival,
    Powerups,
    Weapons,
    Misc,
}

/// Read-only view of everything a rule may look at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    pub elapsed_secs: f64,
    pub score: u64,
    pub health: u8,
    pub ammo: u32,
    pub flawless: bool,
    pub session: Stats,
    pub persistent: Stats,
}

impl StatsSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            elapsed_secs: state.elapsed_secs(),
            score: state.score,
            health: state.player.health,
            ammo: state.player.ammo,
            flawless: state.stats.flawless,
            session: state.stats.session.clone(),
            persistent: state.stats.persistent.clone(),
        }
    }
}

/// A declarative achievement
#[derive(Debug, Clone, Copy)]
pub struct AchievementRule {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
    /// Permanent unlock; otherwise re-shown after the cooldown
    pub once: bool,
    pub condition: fn(&StatsSnapshot) -> bool,
}

/// Default rule table
pub static RULES: &[AchievementRule] = &[
    AchievementRule {
        id: "first_blood",
        title: "First Blood",
        description: "Destroy your first enemy",
        category: Category::Combat,
        once: true,
        condition: |s| s.persistent.total_kills >= 1,
    },
    AchievementRule {
        id: "exterminator",
        title: "Exterminator",
        description: "Destroy 100 enemies",
        category: Category::Combat,
        once: true,
        condition: |s| s.persistent.total_kills >= 100,
    },
    AchievementRule {
        id: "giant_slayer",
        title: "Giant Slayer",
        description: "Shoot down a special enemy",
        category: Category::Combat,
        once: true,
        condition: |s| s.persistent.killed_special_once,
    },
    AchievementRule {
        id: "score_50",
        title: "Warming Up",
        description: "Reach 50 points in one run",
        category: Category::Score,
        once: true,
        condition: |s| s.score >= 50,
    },
    AchievementRule {
        id: "score_200",
        title: "Sharpshooter",
        description: "Reach 200 points in one run",
        category: Category::Score,
        once: true,
        condition: |s| s.score >= 200,
    },
    AchievementRule {
        id: "survivor",
        title: "Survivor",
        description: "Survive for one minute",
        category: Category::Survival,
        once: true,
        condition: |s| s.elapsed_secs >= 60.0,
    },
    AchievementRule {
        id: "marathon",
        title: "Marathon",
        description: "Survive for three minutes",
        category: Category::Survival,
        once: true,
        condition: |s| s.elapsed_secs >= 180.0,
    },
    AchievementRule {
        id: "untouchable",
        title: "Untouchable",
        description: "Last 30 seconds without taking damage",
        category: Category::Survival,
        once: true,
        condition: |s| s.flawless && s.elapsed_secs >= 30.0,
    },
    AchievementRule {
        id: "speed_demon",
        title: "Speed Demon",
        description: "Grab a speed boost",
        category: Category::Powerups,
        once: true,
        condition: |s| s.persistent.speed_pickups >= 1,
    },
    AchievementRule {
        id: "robot_friend",
        title: "Robot Friend",
        description: "Call in a helper bot",
        category: Category::Powerups,
        once: true,
        condition: |s| s.persistent.helper_pickups >= 1,
    },
    AchievementRule {
        id: "reloaded",
        title: "Locked and Loaded",
        description: "Finish a reload",
        category: Category::Weapons,
        once: true,
        condition: |s| s.persistent.reloaded_once,
    },
    AchievementRule {
        id: "click_click",
        title: "Click Click",
        description: "Pull the trigger on an empty magazine",
        category: Category::Weapons,
        once: true,
        condition: |s| s.persistent.ran_out_of_ammo_once,
    },
    AchievementRule {
        id: "frozen",
        title: "Frozen Solid",
        description: "Get paralyzed",
        category: Category::Misc,
        once: true,
        condition: |s| s.persistent.paralyzed_once,
    },
    AchievementRule {
        id: "persistent",
        title: "Never Give Up",
        description: "Die ten times",
        category: Category::Misc,
        once: true,
        condition: |s| s.persistent.death_count >= 10,
    },
    AchievementRule {
        id: "last_stand",
        title: "Last Stand",
        description: "Keep fighting on your last heart",
        category: Category::Survival,
        once: false,
        condition: |s| s.health == 1,
    },
    AchievementRule {
        id: "rampage",
        title: "Rampage",
        description: "Destroy 25 enemies in one run",
        category: Category::Combat,
        once: false,
        condition: |s| s.session.total_kills >= 25,
    },
];

/// Notification for the popup UI
#[derive(Debug, Clone, PartialEq)]
pub struct Unlock {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
    /// Repeat showing of a non-permanent rule
    pub repeat: bool,
}

impl Unlock {
    fn from_rule(rule: &AchievementRule, repeat: bool) -> Self {
        Self {
            id: rule.id,
            title: rule.title,
            description: rule.description,
            category: rule.category,
            repeat,
        }
    }
}

/// Evaluates rules and owns the unlock records
#[derive(Debug, Clone)]
pub struct AchievementTracker {
    rules: &'static [AchievementRule],
    unlocked: BTreeMap<String, bool>,
    last_shown: BTreeMap<String, f64>,
    cooldown_ms: f64,
}

impl AchievementTracker {
    /// Empty records over the default table
    pub fn new(cooldown_ms: f64) -> Self {
        Self::with_rules(RULES, cooldown_ms)
    }

    pub fn with_rules(rules: &'static [AchievementRule], cooldown_ms: f64) -> Self {
        Self {
            rules,
            unlocked: BTreeMap::new(),
            last_shown: BTreeMap::new(),
            cooldown_ms,
        }
    }

    /// Load unlock records; corrupt records read as empty
    pub fn load(store: &impl KeyValueStore, cooldown_ms: f64) -> Self {
        let mut tracker = Self::new(cooldown_ms);
        tracker.unlocked = persistence::load_json(store, KEY_ACHIEVEMENTS).unwrap_or_default();
        tracker.last_shown = persistence::load_json(store, KEY_ACHIEVEMENTS_SHOWN).unwrap_or_default();
        log::info!(
            "Loaded {} unlocked achievements",
            tracker.unlocked.values().filter(|v| **v).count()
        );
        tracker
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.get(id).copied().unwrap_or(false)
    }

    pub fn rules(&self) -> &'static [AchievementRule] {
        self.rules
    }

    /// Every rule with its unlocked flag, in table order
    pub fn list(&self) -> Vec<(&'static AchievementRule, bool)> {
        self.rules
            .iter()
            .map(|rule| (rule, self.is_unlocked(rule.id)))
            .collect()
    }

    /// Check every rule against `snapshot`
    ///
    /// New unlocks are written to `store` before returning. `now_ms` is
    /// wall-clock time, used for the repeat cooldown.
    pub fn evaluate(
        &mut self,
        snapshot: &StatsSnapshot,
        now_ms: f64,
        store: &mut impl KeyValueStore,
    ) -> Vec<Unlock> {
        let mut fired = Vec::new();
        let mut shown_changed = false;

        for rule in self.rules {
            let already = self.is_unlocked(rule.id);
            if rule.once && already {
                continue;
            }
            if !(rule.condition)(snapshot) {
                continue;
            }
            if !rule.once {
                // A stored time ahead of `now_ms` comes from another clock
                // (a previous session) and counts as expired
                if let Some(last) = self.last_shown.get(rule.id) {
                    if (0.0..self.cooldown_ms).contains(&(now_ms - last)) {
                        continue;
                    }
                }
                self.last_shown.insert(rule.id.to_string(), now_ms);
                shown_changed = true;
            }
            self.unlocked.insert(rule.id.to_string(), true);
            log::info!("Achievement unlocked: {}", rule.title);
            fired.push(Unlock::from_rule(rule, already));
        }

        if !fired.is_empty() {
            persistence::save_json(store, KEY_ACHIEVEMENTS, &self.unlocked);
        }
        if shown_changed {
            persistence::save_json(store, KEY_ACHIEVEMENTS_SHOWN, &self.last_shown);
        }
        fired
    }

    /// Forget every unlock (records in the store are removed by the caller)
    pub fn reset(&mut self) {
        self.unlocked.clear();
        self.last_shown.clear();
    }
}
