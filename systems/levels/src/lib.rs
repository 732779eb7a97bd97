#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level ordering and player progress.

mod progress;

pub use progress::{next_level_id, ProgressRecord, ProgressTracker};

use ice_slide_core::Event;
use log::{info, warn};
use thiserror::Error;

/// Outcome of advancing past the current level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The next level in the list was selected.
    Next {
        /// Index of the selected level.
        index: usize,
    },
    /// The last level was completed and the sequence restarted at the first.
    Wrapped,
}

/// Rejected level selection.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelSelectError {
    /// The index lies outside the level list.
    #[error("invalid level index: {index}; {total} levels available")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of configured levels.
        total: usize,
    },
    /// No level carries the requested id.
    #[error("level id '{0}' not found in level list")]
    UnknownId(String),
}

/// Ordered list of level ids with a cursor on the current level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSequencer {
    level_ids: Vec<String>,
    current: usize,
}

impl LevelSequencer {
    /// Creates a sequencer positioned on the first level.
    #[must_use]
    pub fn new(level_ids: Vec<String>) -> Self {
        if level_ids.is_empty() {
            warn!("level sequencer created without levels");
        }
        Self {
            level_ids,
            current: 0,
        }
    }

    /// Identifier of the current level.
    #[must_use]
    pub fn current_id(&self) -> Option<&str> {
        self.level_ids.get(self.current).map(String::as_str)
    }

    /// Zero-based index of the current level.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Number of configured levels.
    #[must_use]
    pub fn total(&self) -> usize {
        self.level_ids.len()
    }

    /// Reports whether the cursor is on the first level.
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.current == 0
    }

    /// Reports whether the cursor is on the last level.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.level_ids.len()
    }

    /// Configured level ids in play order.
    #[must_use]
    pub fn level_ids(&self) -> &[String] {
        &self.level_ids
    }

    /// Re-selects the current level.
    pub fn restart(&mut self, out: &mut Vec<Event>) {
        out.push(Event::LevelChanged {
            index: self.current,
        });
    }

    /// Moves to the next level, wrapping to the first after the last one.
    pub fn next(&mut self, out: &mut Vec<Event>) -> Advance {
        let advance = if self.current + 1 < self.level_ids.len() {
            self.current += 1;
            Advance::Next {
                index: self.current,
            }
        } else {
            info!("all levels completed; returning to the first level");
            self.current = 0;
            Advance::Wrapped
        };
        out.push(Event::LevelChanged {
            index: self.current,
        });
        advance
    }

    /// Moves to the previous level. Does nothing on the first level.
    pub fn previous(&mut self, out: &mut Vec<Event>) -> bool {
        if self.current == 0 {
            info!("already at first level");
            return false;
        }
        self.current -= 1;
        out.push(Event::LevelChanged {
            index: self.current,
        });
        true
    }

    /// Selects the level at `index`.
    pub fn select_index(&mut self, index: usize, out: &mut Vec<Event>) -> Result<(), LevelSelectError> {
        if index >= self.level_ids.len() {
            return Err(LevelSelectError::IndexOutOfRange {
                index,
                total: self.level_ids.len(),
            });
        }
        self.current = index;
        out.push(Event::LevelChanged { index });
        Ok(())
    }

    /// Selects the level carrying `id`.
    pub fn select_id(&mut self, id: &str, out: &mut Vec<Event>) -> Result<(), LevelSelectError> {
        let index = self
            .level_ids
            .iter()
            .position(|level| level == id)
            .ok_or_else(|| LevelSelectError::UnknownId(id.to_owned()))?;
        self.select_index(index, out)
    }
}
