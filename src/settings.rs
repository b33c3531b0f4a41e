//! Game settings and preferences
//!
//! Stored as JSON next to the binary. Any field missing from the file takes
//! its default, and a missing or unreadable file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::sim::Difficulty;

/// Default settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty picked on the selection screen by the headless runner
    pub difficulty: Difficulty,
    /// Name written to the leaderboard
    pub player_name: String,
    /// Leaderboard file
    pub highscore_path: PathBuf,
    /// Root of the images/sounds tree
    pub asset_dir: PathBuf,
    /// Level grid file; the built-in level when absent
    pub level_path: Option<PathBuf>,

    // === Audio ===
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub sfx_enabled: bool,
    pub music_enabled: bool,

    // === Simulation ===
    /// Fixed RNG seed; random per run when absent
    pub seed: Option<u64>,
    /// Let the demo AI drive the player
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            player_name: String::from("Player"),
            highscore_path: PathBuf::from("assets/data/highscores.json"),
            asset_dir: PathBuf::from("assets"),
            level_path: None,

            // Audio
            sfx_volume: 0.7,
            music_volume: 0.5,
            sfx_enabled: true,
            music_enabled: true,

            seed: None,
            autopilot: true,
        }
    }
}

impl Settings {
    /// Effective sound effect volume (0 when disabled)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sfx_enabled {
            self.sfx_volume
        } else {
            0.0
        }
    }

    /// Effective music volume (0 when disabled)
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_enabled {
            self.music_volume
        } else {
            0.0
        }
    }

    /// Reject values the game cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        for (field, volume) in [
            ("sfx_volume", self.sfx_volume),
            ("music_volume", self.music_volume),
        ] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(GameError::InvalidSettings {
                    field,
                    details: format!("{volume} is outside 0.0 - 1.0"),
                });
            }
        }
        if self.player_name.trim().is_empty() {
            return Err(GameError::InvalidSettings {
                field: "player_name",
                details: String::from("must not be blank"),
            });
        }
        Ok(())
    }

    /// Read settings from `path`
    pub fn try_load(path: &Path) -> Result<Self, GameError> {
        let json = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| GameError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(GameError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), GameError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| GameError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}
