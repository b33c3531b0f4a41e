//! Game state container
//!
//! Owns every subsystem the tick drives, the seeded RNG and the injected
//! wall clock. Rendering reads it; only `tick` mutates it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::difficulty::{Difficulty, DifficultyManager};
use super::meteorite::Meteorite;
use super::particles::ParticleSystem;
use super::player::Player;
use super::powerup::{PowerUpKind, PowerUpManager};
use super::ragdoll::Ragdoll;
use super::score::ScoreManager;
use super::state::{GamePhase, StateManager};
use super::world::World;
use crate::clock::Clock;
use crate::consts::*;

/// Things that happened during a tick, for the audio and UI layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A menu command was accepted
    MenuClick,
    Jump,
    /// A meteorite hit the player (shielded or not)
    Collision,
    PowerUp(PowerUpKind),
    /// The death sequence started
    GameOver,
    /// The finished run made the leaderboard at this 1-based rank
    HighScore { rank: usize },
}

pub struct Game {
    pub phases: StateManager,
    pub world: World,
    pub player: Player,
    /// Falling and landed meteorites, in spawn order
    pub meteorites: Vec<Meteorite>,
    pub powerups: PowerUpManager,
    pub difficulty: DifficultyManager,
    pub score: ScoreManager,
    pub particles: ParticleSystem,
    /// Present from the moment the player dies until the next run starts
    pub ragdoll: Option<Ragdoll>,
    /// Name recorded on the leaderboard
    pub player_name: String,
    pub(crate) rng: Pcg32,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) events: Vec<GameEvent>,
    /// Wall-clock start of the death sequence
    pub(crate) death_started_ms: Option<u64>,
    pub(crate) countdown_started_ms: u64,
    pub(crate) countdown_remaining: u32,
    pub(crate) game_started_ms: u64,
    pub(crate) running: bool,
    next_meteorite_id: u32,
}

impl Game {
    /// New game sitting on the main menu
    pub fn new(world: World, score: ScoreManager, clock: Box<dyn Clock>, seed: u64) -> Self {
        log::info!("New game (seed {}, {} columns)", seed, world.columns());
        Self {
            phases: StateManager::new(),
            world,
            player: Player::spawn(),
            meteorites: Vec::new(),
            powerups: PowerUpManager::new(),
            difficulty: DifficultyManager::new(Difficulty::default()),
            score,
            particles: ParticleSystem::new(),
            ragdoll: None,
            player_name: String::from("Player"),
            rng: Pcg32::seed_from_u64(seed),
            clock,
            events: Vec::new(),
            death_started_ms: None,
            countdown_started_ms: 0,
            countdown_remaining: COUNTDOWN_SECONDS,
            game_started_ms: 0,
            running: true,
            next_meteorite_id: 0,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phases.current()
    }

    /// False once the player asked to quit
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The player has been hit and the ragdoll is still falling
    pub fn is_dying(&self) -> bool {
        self.death_started_ms.is_some()
    }

    /// Whole seconds left on the pre-game countdown
    pub fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    /// Wall-clock seconds since the current run left the countdown
    pub fn game_time_secs(&self) -> u64 {
        self.clock.now_ms().saturating_sub(self.game_started_ms) / 1000
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Events from the most recent tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// HUD labels for the effects currently in force
    pub fn active_effects(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.player.has_shield {
            labels.push(PowerUpKind::Shield.label());
        }
        if self.meteorites.iter().any(|m| m.slowed && !m.grounded()) {
            labels.push(PowerUpKind::SlowMotion.label());
        }
        if self.score.multiplier() > 1.0 {
            labels.push(PowerUpKind::ScoreMultiplier.label());
        }
        labels
    }

    /// Reset every subsystem and enter the countdown
    pub fn start_game(&mut self, difficulty: Difficulty) {
        let now = self.clock.now_ms();
        self.score.reset();
        self.difficulty = DifficultyManager::new(difficulty);
        self.player = Player::spawn();
        self.meteorites.clear();
        self.powerups.clear();
        self.particles.clear();
        self.ragdoll = None;
        self.death_started_ms = None;
        self.countdown_started_ms = now;
        self.countdown_remaining = COUNTDOWN_SECONDS;
        self.phases.transition_to(GamePhase::Countdown);
        log::info!("Starting {} game", difficulty.as_str());
    }

    /// Spawn a meteorite in a random column at the current fall speed
    pub fn spawn_meteorite(&mut self) -> u32 {
        let id = self.next_id();
        let meteorite = Meteorite::spawn(
            id,
            self.world.columns(),
            self.difficulty.meteorite_speed(),
            &mut self.rng,
        );
        self.meteorites.push(meteorite);
        id
    }

    /// Place a meteorite with its sprite top-left at `pos`
    pub fn spawn_meteorite_at(&mut self, pos: Vec2, velocity: f32) -> u32 {
        let id = self.next_id();
        self.meteorites.push(Meteorite::new(id, pos, velocity));
        id
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_meteorite_id;
        self.next_meteorite_id += 1;
        id
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phases.current())
            .field("score", &self.score.current_score)
            .field("meteorites", &self.meteorites.len())
            .field("powerups", &self.powerups.len())
            .field("dying", &self.is_dying())
            .finish()
    }
}
