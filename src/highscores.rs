//! Best score and best survival time
//!
//! Both records only ever move up.

use crate::persistence::{self, KEY_BEST_TIME, KEY_HIGH_SCORE, KeyValueStore};

/// What a finished run improved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    pub new_high_score: bool,
    pub new_best_time: bool,
}

/// Persistent records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScores {
    pub high_score: u64,
    /// Whole seconds
    pub best_time_secs: u64,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records; missing or non-numeric values read as zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        let scores = Self {
            high_score: persistence::load_u64(store, KEY_HIGH_SCORE),
            best_time_secs: persistence::load_u64(store, KEY_BEST_TIME),
        };
        log::info!(
            "Records: high score {}, best time {}s",
            scores.high_score,
            scores.best_time_secs
        );
        scores
    }

    /// Whether a score beats the current record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.high_score
    }

    /// Fold a finished run into the records, saving what improved
    pub fn record_run(
        &mut self,
        score: u64,
        elapsed_secs: f64,
        store: &mut impl KeyValueStore,
    ) -> RecordOutcome {
        let mut outcome = RecordOutcome::default();
        if self.qualifies(score) {
            self.high_score = score;
            persistence::save_u64(store, KEY_HIGH_SCORE, score);
            outcome.new_high_score = true;
            log::info!("New high score: {}", score);
        }
        let secs = elapsed_secs.max(0.0).floor() as u64;
        if secs > self.best_time_secs {
            self.best_time_secs = secs;
            persistence::save_u64(store, KEY_BEST_TIME, secs);
            outcome.new_best_time = true;
            log::info!("New best time: {}s", secs);
        }
        outcome
    }
}

/// Format whole seconds as m:ss
pub fn format_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_records_only_increase() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::load(&store);
        assert_eq!(scores, HighScores::new());

        let outcome = scores.record_run(30, 45.9, &mut store);
        assert!(outcome.new_high_score && outcome.new_best_time);
        assert_eq!(scores.best_time_secs, 45);

        let outcome = scores.record_run(10, 12.0, &mut store);
        assert_eq!(outcome, RecordOutcome::default());
        assert_eq!(scores.high_score, 30);

        // Equal score is not a new record
        assert!(!scores.record_run(30, 0.0, &mut store).new_high_score);

        let reloaded = HighScores::load(&store);
        assert_eq!(reloaded.high_score, 30);
        assert_eq!(reloaded.best_time_secs, 45);
    }

    #[test]
    fn test_corrupt_records_are_zero() {
        let mut store = MemoryStore::new();
        store.set(KEY_HIGH_SCORE, "NaN");
        store.set(KEY_BEST_TIME, "{}");
        assert_eq!(HighScores::load(&store), HighScores::new());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(75), "1:15");
        assert_eq!(format_duration(600), "10:00");
    }
}
