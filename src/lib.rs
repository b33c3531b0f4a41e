//! Meteor Dodge - A 2D arcade dodging game
//!
//! Core modules:
//! - `sim`: Simulation core (physics, collisions, phases, scoring, power-ups)
//! - `highscores`: Ranked top-10 table with JSON persistence
//! - `settings`: Player preferences and runtime configuration
//! - `audio`: Audio sink collaborator (fire-and-forget sound effects)
//! - `assets`: Asset provider collaborator (opaque image/sound handles)
//! - `clock`: Wall-clock source injected into the simulation

pub mod assets;
pub mod audio;
pub mod clock;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Display dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// World tile edge length
    pub const TILE_SIZE: f32 = 50.0;

    /// Physics is tuned against a 60 fps reference; every integration step
    /// multiplies by this so behaviour is independent of the real tick rate.
    pub const FRAME_SCALE: f32 = 60.0;
    /// Largest dt a single tick may integrate (20 updates/sec floor)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Gravity (pixels/frame² at the reference rate)
    pub const GRAVITY: f32 = 1.0;
    pub const MAX_FALL_SPEED: f32 = 50.0;
    pub const JUMP_VELOCITY: f32 = -15.0;
    pub const PLAYER_SPEED: f32 = 6.0;

    /// Player sprite and hitbox
    pub const PLAYER_SIZE: f32 = 70.0;
    pub const PLAYER_HITBOX_OFFSET_X: f32 = 10.0;
    pub const PLAYER_HITBOX_OFFSET_Y: f32 = 5.0;
    pub const PLAYER_HITBOX_WIDTH: f32 = 50.0;
    pub const PLAYER_HITBOX_HEIGHT: f32 = 60.0;
    pub const PLAYER_START_X: f32 = 100.0;

    /// Y coordinate where entities come to rest
    pub const GROUND_LEVEL: f32 = SCREEN_HEIGHT - 160.0;

    /// Meteorite sprite and (centered) hitbox
    pub const METEORITE_SIZE: f32 = TILE_SIZE;
    pub const METEORITE_HITBOX_WIDTH: f32 = 30.0;
    pub const METEORITE_HITBOX_HEIGHT: f32 = 30.0;
    /// Default fall velocity (negative = downward)
    pub const METEORITE_BASE_VELOCITY: f32 = -8.0;

    /// Difficulty floors
    pub const MIN_SPAWN_RATE: f32 = 5.0;
    pub const MAX_FALL_VELOCITY: f32 = -20.0;
    /// Seconds between spawn-rate adjustments
    pub const SPAWN_ADJUST_INTERVAL: f32 = 1.0;
    /// Seconds between fall-speed adjustments
    pub const SPEED_ADJUST_INTERVAL: f32 = 10.0;

    /// Power-ups
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.02;
    pub const POWERUP_SPAWN_INTERVAL: f32 = 1.0;
    pub const POWERUP_LIFETIME: f32 = 10.0;
    pub const POWERUP_SIZE: f32 = 40.0;
    pub const POWERUP_HOVER_HEIGHT: f32 = 100.0;
    pub const SLOWMO_FACTOR: f32 = 0.5;
    pub const SCORE_MULTIPLIER: f32 = 2.0;
    pub const MULTIPLIER_DURATION_MS: u64 = 10_000;

    /// Scoring
    pub const SCORE_PER_SECOND: f32 = 10.0;
    pub const METEORITE_DODGE_BONUS: f32 = 50.0;

    /// Phase timing
    pub const COUNTDOWN_SECONDS: u32 = 3;
    pub const DEATH_ANIMATION_TIMEOUT_MS: u64 = 3_000;
}
