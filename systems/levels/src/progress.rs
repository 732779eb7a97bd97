use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

const LEVEL_PREFIX: &str = "level";

/// Serialisable snapshot of player progress.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressRecord {
    /// Identifiers of completed levels.
    pub completed: Vec<String>,
    /// Identifiers of unlocked levels.
    pub unlocked: Vec<String>,
}

/// Tracks which levels are completed and unlocked.
///
/// The first level is always unlocked. Completing `levelN` unlocks
/// `levelN+1`. With `unlock_all` set every level reports as unlocked and none
/// as completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressTracker {
    first_level_id: String,
    unlock_all: bool,
    completed: BTreeSet<String>,
    unlocked: BTreeSet<String>,
}

impl ProgressTracker {
    /// Creates a tracker with only the first level unlocked.
    #[must_use]
    pub fn new(first_level_id: impl Into<String>, unlock_all: bool) -> Self {
        Self::from_record(ProgressRecord::default(), first_level_id, unlock_all)
    }

    /// Restores a tracker from a persisted record.
    #[must_use]
    pub fn from_record(
        record: ProgressRecord,
        first_level_id: impl Into<String>,
        unlock_all: bool,
    ) -> Self {
        let mut tracker = Self {
            first_level_id: first_level_id.into(),
            unlock_all,
            completed: keep_named(record.completed),
            unlocked: keep_named(record.unlocked),
        };
        tracker.unlock_first();
        tracker
    }

    /// Captures the tracker state for persistence.
    #[must_use]
    pub fn record(&self) -> ProgressRecord {
        ProgressRecord {
            completed: self.completed.iter().cloned().collect(),
            unlocked: self.unlocked.iter().cloned().collect(),
        }
    }

    /// Marks `level_id` completed, unlocking it and its numeric successor.
    ///
    /// Returns `true` when the level was not completed before.
    pub fn complete(&mut self, level_id: &str) -> bool {
        if level_id.is_empty() || !self.completed.insert(level_id.to_owned()) {
            return false;
        }
        let _ = self.unlocked.insert(level_id.to_owned());
        if let Some(next) = next_level_id(level_id) {
            debug!("completing {level_id} unlocks {next}");
            let _ = self.unlocked.insert(next);
        }
        true
    }

    /// Unlocks `level_id`. Returns `true` when it was locked before.
    pub fn unlock(&mut self, level_id: &str) -> bool {
        !level_id.is_empty() && self.unlocked.insert(level_id.to_owned())
    }

    /// Unlocks every provided level id.
    pub fn unlock_all<'a>(&mut self, level_ids: impl IntoIterator<Item = &'a str>) {
        for level_id in level_ids {
            let _ = self.unlock(level_id.trim());
        }
    }

    /// Reports whether `level_id` is completed.
    #[must_use]
    pub fn is_completed(&self, level_id: &str) -> bool {
        !self.unlock_all && self.completed.contains(level_id)
    }

    /// Reports whether `level_id` may be played.
    #[must_use]
    pub fn is_unlocked(&self, level_id: &str) -> bool {
        self.unlock_all || level_id == self.first_level_id || self.unlocked.contains(level_id)
    }

    /// Forgets all progress; only the first level stays unlocked.
    pub fn reset(&mut self) {
        self.completed.clear();
        self.unlocked.clear();
        self.unlock_first();
    }

    /// Number of completed levels.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Number of unlocked levels.
    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Completed level ids in sorted order.
    #[must_use]
    pub fn completed_levels(&self) -> Vec<&str> {
        self.completed.iter().map(String::as_str).collect()
    }

    /// Unlocked level ids in sorted order.
    #[must_use]
    pub fn unlocked_levels(&self) -> Vec<&str> {
        self.unlocked.iter().map(String::as_str).collect()
    }

    fn unlock_first(&mut self) {
        let first = self.first_level_id.clone();
        let _ = self.unlock(&first);
    }
}

/// Successor of a `levelN` identifier, e.g. `level2` for `level1`.
///
/// `N` is a signed integer, so `level-1` is followed by `level0`.
#[must_use]
pub fn next_level_id(level_id: &str) -> Option<String> {
    let number: i32 = level_id.strip_prefix(LEVEL_PREFIX)?.parse().ok()?;
    Some(format!("{LEVEL_PREFIX}{}", number.checked_add(1)?))
}

fn keep_named(ids: Vec<String>) -> BTreeSet<String> {
    ids.into_iter()
        .map(|id| id.trim().to_owned())
        .filter(|id| !id.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successor_requires_numeric_suffix() {
        assert_eq!(next_level_id("level1").as_deref(), Some("level2"));
        assert_eq!(next_level_id("level09").as_deref(), Some("level10"));
        assert_eq!(next_level_id("level-1").as_deref(), Some("level0"));
        assert_eq!(next_level_id("level2147483647"), None);
        assert_eq!(next_level_id("levelX"), None);
        assert_eq!(next_level_id("bonus1"), None);
    }

    #[test]
    fn record_drops_blank_ids() {
        let record = ProgressRecord {
            completed: vec![" ".to_owned(), "level1".to_owned()],
            unlocked: vec![String::new()],
        };
        let tracker = ProgressTracker::from_record(record, "level1", false);

        assert_eq!(tracker.completed_levels(), ["level1"]);
        assert_eq!(tracker.unlocked_levels(), ["level1"]);
    }
}
