//! Error types for persistence and startup configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the fallible (non-gameplay) parts of the game.
///
/// None of these are fatal mid-game: persistence failures are logged and
/// swallowed by callers, configuration errors only abort startup.
#[derive(Debug, Error)]
pub enum GameError {
    /// Filesystem access failed.
    #[error("I/O error on '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error in '{}': {}", .path.display(), .source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The world grid has no tile row or the row has no columns.
    #[error("World grid is empty: meteorites need at least one tile column to spawn in")]
    EmptyWorld,

    /// A settings value is outside its accepted range.
    #[error("Invalid setting '{field}': {details}")]
    InvalidSettings { field: &'static str, details: String },
}
