//! Progressive difficulty
//!
//! Two independent continuous knobs, both stepping on simulation time:
//! every second the spawn-rate denominator shrinks (more meteorites), and
//! every ten seconds the fall speed grows (more negative). Both have floors.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Difficulty presets offered on the selection screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Starting values and progression rates for this preset
    pub fn settings(&self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings {
                spawn_rate: 60.0,
                fall_speed: -6.0,
                spawn_decay: 0.995,
                speed_increment: 0.05,
            },
            Difficulty::Medium => DifficultySettings {
                spawn_rate: 40.0,
                fall_speed: -8.0,
                spawn_decay: 0.99,
                speed_increment: 0.08,
            },
            Difficulty::Hard => DifficultySettings {
                spawn_rate: 20.0,
                fall_speed: -10.0,
                spawn_decay: 0.985,
                speed_increment: 0.12,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Spawn probability denominator: one spawn per ~`spawn_rate` ticks
    pub spawn_rate: f32,
    /// Meteorite fall velocity (negative = downward)
    pub fall_speed: f32,
    /// Multiplier applied to `spawn_rate` each second (< 1)
    pub spawn_decay: f32,
    /// Subtracted from `fall_speed` every ten seconds
    pub speed_increment: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyManager {
    pub difficulty: Difficulty,
    settings: DifficultySettings,
    spawn_rate: f32,
    fall_speed: f32,
    time_elapsed: f32,
    last_spawn_adjust: f32,
    last_speed_adjust: f32,
}

impl DifficultyManager {
    pub fn new(difficulty: Difficulty) -> Self {
        let settings = difficulty.settings();
        Self {
            difficulty,
            settings,
            spawn_rate: settings.spawn_rate,
            fall_speed: settings.fall_speed,
            time_elapsed: 0.0,
            last_spawn_adjust: 0.0,
            last_speed_adjust: 0.0,
        }
    }

    pub fn spawn_rate(&self) -> f32 {
        self.spawn_rate
    }

    pub fn fall_speed(&self) -> f32 {
        self.fall_speed
    }

    pub fn time_elapsed(&self) -> f32 {
        self.time_elapsed
    }

    pub fn update(&mut self, dt: f32) {
        self.time_elapsed += dt;

        if self.time_elapsed - self.last_spawn_adjust >= SPAWN_ADJUST_INTERVAL {
            self.last_spawn_adjust = self.time_elapsed;
            self.spawn_rate = (self.spawn_rate * self.settings.spawn_decay).max(MIN_SPAWN_RATE);
        }

        if self.time_elapsed - self.last_speed_adjust >= SPEED_ADJUST_INTERVAL {
            self.last_speed_adjust = self.time_elapsed;
            self.fall_speed =
                (self.fall_speed - self.settings.speed_increment).max(MAX_FALL_VELOCITY);
            log::debug!(
                "Difficulty up: fall speed {:.2}, spawn rate {:.2}",
                self.fall_speed,
                self.spawn_rate
            );
        }
    }

    /// Roll for a meteorite spawn.
    ///
    /// The probability is per call (1 / round(spawn_rate)), so this must be
    /// called exactly once per simulation tick.
    pub fn should_spawn_meteorite<R: Rng>(&self, rng: &mut R) -> bool {
        let upper = (self.spawn_rate.round() as u32).max(1);
        rng.random_range(1..=upper) == 1
    }

    /// Velocity to give a newly spawned meteorite
    pub fn meteorite_speed(&self) -> f32 {
        self.fall_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_presets() {
        let dm = DifficultyManager::new(Difficulty::Hard);
        assert_eq!(dm.spawn_rate(), 20.0);
        assert_eq!(dm.meteorite_speed(), -10.0);
        assert_eq!(Difficulty::from_str("MED"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_spawn_rate_decays_each_second() {
        let mut dm = DifficultyManager::new(Difficulty::Medium);
        // Just under a second: no change
        for _ in 0..59 {
            dm.update(1.0 / 60.0);
        }
        assert_eq!(dm.spawn_rate(), 40.0);
        dm.update(1.0 / 60.0 + 0.001);
        assert!((dm.spawn_rate() - 39.6).abs() < 1e-4);
    }

    #[test]
    fn test_fall_speed_steps_every_ten_seconds() {
        let mut dm = DifficultyManager::new(Difficulty::Medium);
        dm.update(9.5);
        assert_eq!(dm.fall_speed(), -8.0);
        dm.update(0.5);
        assert!((dm.fall_speed() - (-8.08)).abs() < 1e-4);
    }

    #[test]
    fn test_floors_hold_after_long_run() {
        let mut dm = DifficultyManager::new(Difficulty::Hard);
        for _ in 0..200_000 {
            dm.update(0.05);
        }
        assert_eq!(dm.spawn_rate(), MIN_SPAWN_RATE);
        assert_eq!(dm.fall_speed(), MAX_FALL_VELOCITY);
    }

    #[test]
    fn test_spawn_probability_matches_rate() {
        let mut dm = DifficultyManager::new(Difficulty::Hard);
        dm.spawn_rate = 5.0;
        let mut rng = Pcg32::seed_from_u64(42);
        let trials = 100_000;
        let hits = (0..trials)
            .filter(|_| dm.should_spawn_meteorite(&mut rng))
            .count();
        let rate = hits as f64 / trials as f64;
        assert!((rate - 0.2).abs() < 0.01, "observed spawn rate {rate}");
    }

    #[test]
    fn test_spawn_rate_below_one_always_spawns() {
        let mut dm = DifficultyManager::new(Difficulty::Easy);
        dm.spawn_rate = 0.2;
        let mut rng = Pcg32::seed_from_u64(0);
        assert!((0..100).all(|_| dm.should_spawn_meteorite(&mut rng)));
    }

    proptest! {
        #[test]
        fn prop_difficulty_floors(
            preset in prop::sample::select(vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]),
            dts in prop::collection::vec(0.0f32..2.0, 1..400),
        ) {
            let mut dm = DifficultyManager::new(preset);
            let mut prev_rate = dm.spawn_rate();
            let mut prev_speed = dm.fall_speed();
            for dt in dts {
                dm.update(dt);
                prop_assert!(dm.spawn_rate() >= MIN_SPAWN_RATE);
                prop_assert!(dm.fall_speed() >= MAX_FALL_VELOCITY);
                // Monotonic: never gets easier
                prop_assert!(dm.spawn_rate() <= prev_rate);
                prop_assert!(dm.fall_speed() <= prev_speed);
                prev_rate = dm.spawn_rate();
                prev_speed = dm.fall_speed();
            }
        }
    }
}
