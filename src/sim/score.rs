//! Score keeping
//!
//! Points come from two sources: a trickle per unit of survived time and a
//! flat bonus per dodged meteorite, both scaled by the active multiplier.
//! The multiplier window is an absolute wall-clock deadline, so it keeps
//! running while the game is paused.

use std::path::PathBuf;

use crate::consts::*;
use crate::highscores::{HighScoreEntry, HighScores};

#[derive(Debug, Clone)]
pub struct ScoreManager {
    pub current_score: u64,
    multiplier: f32,
    /// Wall-clock deadline (ms) of the active multiplier window
    multiplier_end_ms: Option<u64>,
    /// Seconds of gameplay this run
    pub time_elapsed: f32,
    pub dodge_count: u32,
    high_scores: HighScores,
    /// Where the leaderboard is persisted; None keeps it in memory only
    store: Option<PathBuf>,
}

impl ScoreManager {
    /// Score manager backed by the leaderboard file at `store` (if any)
    pub fn new(store: Option<PathBuf>) -> Self {
        let high_scores = store.as_deref().map(HighScores::load).unwrap_or_default();
        Self::with_high_scores(high_scores, store)
    }

    pub fn with_high_scores(high_scores: HighScores, store: Option<PathBuf>) -> Self {
        Self {
            current_score: 0,
            multiplier: 1.0,
            multiplier_end_ms: None,
            time_elapsed: 0.0,
            dodge_count: 0,
            high_scores,
            store,
        }
    }

    /// Clear the per-run values; the leaderboard is kept
    pub fn reset(&mut self) {
        self.current_score = 0;
        self.multiplier = 1.0;
        self.multiplier_end_ms = None;
        self.time_elapsed = 0.0;
        self.dodge_count = 0;
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Survival points for one tick
    pub fn update(&mut self, dt: f32) {
        self.time_elapsed += dt;
        let gain = (SCORE_PER_SECOND * dt * self.multiplier).floor();
        self.current_score += gain.max(0.0) as u64;
    }

    /// A meteorite reached the ground without touching the player
    pub fn add_meteorite_dodge(&mut self) {
        let bonus = (METEORITE_DODGE_BONUS * self.multiplier).floor();
        self.current_score += bonus.max(0.0) as u64;
        self.dodge_count += 1;
    }

    /// Scale score gains by `value` until `now_ms + duration_ms`
    pub fn set_multiplier(&mut self, value: f32, duration_ms: u64, now_ms: u64) {
        self.multiplier = value;
        self.multiplier_end_ms = Some(now_ms + duration_ms);
    }

    /// Drop back to 1x once the window has passed
    pub fn check_multiplier_expiry(&mut self, now_ms: u64) {
        if let Some(end) = self.multiplier_end_ms {
            if now_ms >= end {
                self.multiplier = 1.0;
                self.multiplier_end_ms = None;
            }
        }
    }

    /// Milliseconds left in the multiplier window (0 when inactive)
    pub fn multiplier_remaining_ms(&self, now_ms: u64) -> u64 {
        self.multiplier_end_ms
            .map(|end| end.saturating_sub(now_ms))
            .unwrap_or(0)
    }

    /// True if the current score would make the leaderboard
    pub fn is_high_score(&self) -> bool {
        self.high_scores.qualifies(self.current_score)
    }

    /// 1-based leaderboard position of the current score
    pub fn rank(&self) -> Option<usize> {
        self.high_scores.potential_rank(self.current_score)
    }

    /// Record the current run and persist the leaderboard.
    ///
    /// A failed write is logged; the in-memory table is still updated.
    pub fn save_high_score(&mut self, name: &str) -> Option<usize> {
        let rank = self.high_scores.add(HighScoreEntry {
            name: name.to_string(),
            score: self.current_score,
            time: self.time_elapsed as u32,
            meteorites_dodged: self.dodge_count,
        });

        if let Some(path) = &self.store {
            if let Err(e) = self.high_scores.save(path) {
                log::error!("Could not save high scores: {}", e);
            }
        }
        rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ScoreManager {
        ScoreManager::with_high_scores(HighScores::new(), None)
    }

    #[test]
    fn test_time_score_is_floored_per_tick() {
        let mut sm = manager();
        // 10 * 0.05 = 0.5 -> 0 per tick
        sm.update(0.05);
        assert_eq!(sm.current_score, 0);
        // 10 * 0.25 = 2.5 -> 2
        sm.update(0.25);
        assert_eq!(sm.current_score, 2);
        assert!((sm.time_elapsed - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_dodge_bonus_uses_multiplier() {
        let mut sm = manager();
        sm.add_meteorite_dodge();
        assert_eq!(sm.current_score, 50);
        assert_eq!(sm.dodge_count, 1);

        sm.set_multiplier(1.5, 1_000, 0);
        sm.add_meteorite_dodge();
        assert_eq!(sm.current_score, 50 + 75);
        assert_eq!(sm.dodge_count, 2);
    }

    #[test]
    fn test_multiplier_expires_on_wall_clock() {
        let mut sm = manager();
        sm.set_multiplier(2.0, 5_000, 1_000);
        assert_eq!(sm.multiplier(), 2.0);

        sm.check_multiplier_expiry(5_999);
        assert_eq!(sm.multiplier(), 2.0);
        assert_eq!(sm.multiplier_remaining_ms(5_999), 1);

        sm.check_multiplier_expiry(6_000);
        assert_eq!(sm.multiplier(), 1.0);
        assert_eq!(sm.multiplier_remaining_ms(6_000), 0);
    }

    #[test]
    fn test_reset_keeps_leaderboard() {
        let mut sm = manager();
        sm.current_score = 400;
        sm.save_high_score("Ada");
        sm.set_multiplier(2.0, 100, 0);
        sm.reset();
        assert_eq!(sm.current_score, 0);
        assert_eq!(sm.multiplier(), 1.0);
        assert_eq!(sm.dodge_count, 0);
        assert_eq!(sm.high_scores().top_score(), Some(400));
    }

    #[test]
    fn test_is_high_score_and_rank() {
        let mut sm = manager();
        for s in 1..=10u64 {
            sm.current_score = s * 100;
            sm.save_high_score("p");
        }
        sm.current_score = 100;
        assert!(!sm.is_high_score());
        assert_eq!(sm.rank(), None);

        sm.current_score = 550;
        assert!(sm.is_high_score());
        assert_eq!(sm.rank(), Some(6));
    }

    #[test]
    fn test_rank_matches_saved_rank_on_tie() {
        let mut sm = manager();
        sm.current_score = 100;
        sm.save_high_score("first");

        sm.current_score = 100;
        let predicted = sm.rank();
        assert_eq!(predicted, Some(2));
        assert_eq!(sm.save_high_score("second"), predicted);
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        // A path under a file cannot be created
        let blocker = std::env::temp_dir().join(format!("meteor_dodge_blocker_{}", std::process::id()));
        std::fs::write(&blocker, "x").unwrap();
        let mut sm = ScoreManager::with_high_scores(HighScores::new(), Some(blocker.join("hs.json")));
        sm.current_score = 10;
        assert_eq!(sm.save_high_score("p"), Some(1));
        assert_eq!(sm.high_scores().scores.len(), 1);
        let _ = std::fs::remove_file(&blocker);
    }
}
