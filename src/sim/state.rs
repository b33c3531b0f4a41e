//! Game phase state machine
//!
//! Exactly one phase is current at any time. The machine is permissive:
//! any phase may move to any other, and only the orchestrator decides
//! which transitions are meaningful.

use serde::{Deserialize, Serialize};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    Menu,
    /// Easy / Medium / Hard picker
    DifficultySelect,
    /// How-to-play screen
    Tutorial,
    /// 3-2-1 before play starts
    Countdown,
    /// Active gameplay (including the death animation)
    Playing,
    /// Gameplay frozen
    Paused,
    /// Run ended, results shown
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "Menu",
            GamePhase::DifficultySelect => "DifficultySelect",
            GamePhase::Tutorial => "Tutorial",
            GamePhase::Countdown => "Countdown",
            GamePhase::Playing => "Playing",
            GamePhase::Paused => "Paused",
            GamePhase::GameOver => "GameOver",
        }
    }
}

/// Tracks the current phase and the one before it (for pause/resume)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateManager {
    current: GamePhase,
    previous: Option<GamePhase>,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    /// Start in the menu
    pub fn new() -> Self {
        Self {
            current: GamePhase::Menu,
            previous: None,
        }
    }

    pub fn current(&self) -> GamePhase {
        self.current
    }

    pub fn previous(&self) -> Option<GamePhase> {
        self.previous
    }

    #[inline]
    pub fn is(&self, phase: GamePhase) -> bool {
        self.current == phase
    }

    /// Move to `phase`. Re-entering the current phase does nothing.
    pub fn transition_to(&mut self, phase: GamePhase) {
        if phase == self.current {
            return;
        }
        log::info!("State: {} -> {}", self.current.as_str(), phase.as_str());
        self.previous = Some(self.current);
        self.current = phase;
    }

    /// Go back to the phase before the current one, if any
    pub fn return_to_previous(&mut self) {
        if let Some(prev) = self.previous {
            self.transition_to(prev);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_menu() {
        let sm = StateManager::new();
        assert_eq!(sm.current(), GamePhase::Menu);
        assert_eq!(sm.previous(), None);
    }

    #[test]
    fn test_transition_records_previous() {
        let mut sm = StateManager::new();
        sm.transition_to(GamePhase::DifficultySelect);
        assert_eq!(sm.current(), GamePhase::DifficultySelect);
        assert_eq!(sm.previous(), Some(GamePhase::Menu));
    }

    #[test]
    fn test_same_phase_is_noop() {
        let mut sm = StateManager::new();
        sm.transition_to(GamePhase::Playing);
        sm.transition_to(GamePhase::Playing);
        // Previous still points at Menu, not Playing
        assert_eq!(sm.previous(), Some(GamePhase::Menu));
    }

    #[test]
    fn test_pause_resume_round_trip() {
        let mut sm = StateManager::new();
        sm.transition_to(GamePhase::Playing);
        sm.transition_to(GamePhase::Paused);
        sm.return_to_previous();
        assert!(sm.is(GamePhase::Playing));
        assert_eq!(sm.previous(), Some(GamePhase::Paused));
    }

    #[test]
    fn test_return_without_previous_is_noop() {
        let mut sm = StateManager::new();
        sm.return_to_previous();
        assert!(sm.is(GamePhase::Menu));
    }

    #[test]
    fn test_any_transition_allowed() {
        let mut sm = StateManager::new();
        sm.transition_to(GamePhase::GameOver);
        sm.transition_to(GamePhase::Playing);
        assert!(sm.is(GamePhase::Playing));
    }
}
