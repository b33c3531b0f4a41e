//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, clock readings and
//! inputs, a run replays identically:
//! - Seeded RNG only
//! - Wall-clock time only through the injected `Clock`
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod difficulty;
pub mod game;
pub mod meteorite;
pub mod particles;
pub mod player;
pub mod powerup;
pub mod ragdoll;
pub mod score;
pub mod state;
pub mod tick;
pub mod world;

pub use body::PhysicsBody;
pub use collision::{Rect, intersects};
pub use difficulty::{Difficulty, DifficultyManager, DifficultySettings};
pub use game::{Game, GameEvent};
pub use meteorite::Meteorite;
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use player::{Player, PlayerInput, PlayerPose};
pub use powerup::{EffectContext, PowerUp, PowerUpKind, PowerUpManager};
pub use ragdoll::{LimbKind, Ragdoll, RagdollLimb};
pub use score::ScoreManager;
pub use state::{GamePhase, StateManager};
pub use tick::{MenuCommand, TickInput, tick};
pub use world::{Tile, World};
