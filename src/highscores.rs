//! High score leaderboard system
//!
//! Persisted to a JSON file, tracks top 10 scores:
//!
//! ```json
//! { "scores": [ { "name": "Player", "score": 1200, "time": 84, "meteorites_dodged": 21 } ] }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player name
    pub name: String,
    /// Final score
    pub score: u64,
    /// Seconds survived
    pub time: u32,
    /// Meteorites that reached the ground without hitting the player
    pub meteorites_dodged: u32,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HighScores {
    #[serde(default)]
    pub scores: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.scores.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.scores.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify).
    /// Ties rank below the existing entry, matching `add`.
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        Some(self.insert_position(score) + 1)
    }

    /// Index a new score goes in: after any equal scores
    fn insert_position(&self, score: u64) -> usize {
        self.scores
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.scores.len())
    }

    /// Add a new entry and re-rank, keeping only the top 10.
    /// Returns the rank achieved (1-indexed) or None if it fell off the table.
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        // Earlier runs keep their place on a tie
        let pos = self.insert_position(entry.score);
        self.scores.insert(pos, entry);

        // Trim to max size
        self.scores.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.scores.first().map(|e| e.score)
    }

    /// Read the leaderboard from `path`.
    ///
    /// Entries are re-sorted and truncated so a hand-edited file can never
    /// break the ordering invariant.
    pub fn try_load(path: &Path) -> Result<Self, GameError> {
        let json = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut scores: HighScores =
            serde_json::from_str(&json).map_err(|source| GameError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        scores.scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.scores.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    /// Load high scores, falling back to an empty table on any failure
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.scores.len());
                scores
            }
            Err(GameError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not load high scores: {}", e);
                Self::new()
            }
        }
    }

    /// Write the leaderboard to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), GameError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| GameError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| GameError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("High scores saved ({} entries)", self.scores.len());
        Ok(())
    }
}
