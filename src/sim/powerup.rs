//! Collectible power-ups
//!
//! Power-ups hover above the ground for a limited time. Touching one latches
//! it as collected (reported exactly once) and its effect is applied through
//! a per-kind dispatch table.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, intersects};
use super::meteorite::Meteorite;
use super::player::Player;
use super::score::ScoreManager;
use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Absorbs one meteorite hit
    Shield,
    /// Halves the speed of every meteorite currently falling
    SlowMotion,
    /// Doubles score gains for a while
    ScoreMultiplier,
}

/// Everything a power-up effect is allowed to touch
pub struct EffectContext<'a> {
    pub player: &'a mut Player,
    pub meteorites: &'a mut [Meteorite],
    pub score: &'a mut ScoreManager,
    /// Wall-clock time of collection
    pub now_ms: u64,
}

/// An effect applied once, at collection time
pub type EffectFn = fn(&mut EffectContext<'_>);

fn apply_shield(ctx: &mut EffectContext<'_>) {
    ctx.player.has_shield = true;
}

fn apply_slow_motion(ctx: &mut EffectContext<'_>) {
    // One-off: only meteorites alive right now are slowed
    for meteorite in ctx.meteorites.iter_mut() {
        meteorite.velocity *= SLOWMO_FACTOR;
        meteorite.slowed = true;
    }
}

fn apply_score_multiplier(ctx: &mut EffectContext<'_>) {
    ctx.score
        .set_multiplier(SCORE_MULTIPLIER, MULTIPLIER_DURATION_MS, ctx.now_ms);
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Shield,
        PowerUpKind::SlowMotion,
        PowerUpKind::ScoreMultiplier,
    ];

    /// Effect applied when this kind is collected
    pub fn effect(self) -> EffectFn {
        match self {
            PowerUpKind::Shield => apply_shield,
            PowerUpKind::SlowMotion => apply_slow_motion,
            PowerUpKind::ScoreMultiplier => apply_score_multiplier,
        }
    }

    /// HUD label shown while the effect is active
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Shield => "Shield Active",
            PowerUpKind::SlowMotion => "Slow Motion",
            PowerUpKind::ScoreMultiplier => "Score x2",
        }
    }

    /// Asset file stem
    pub fn asset_name(self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::SlowMotion => "slowmo",
            PowerUpKind::ScoreMultiplier => "multiplier",
        }
    }

    /// Apply this kind's effect
    pub fn apply(self, ctx: &mut EffectContext<'_>) {
        (self.effect())(ctx);
    }
}

/// A power-up floating in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Resting center position
    pub pos: Vec2,
    /// Collision / sprite rectangle (follows the bob)
    pub rect: Rect,
    /// Seconds left before it despawns
    pub lifetime: f32,
    pub collected: bool,
    bob_offset: f32,
}

impl PowerUp {
    const BOB_SPEED: f32 = 3.0;
    const BOB_AMPLITUDE: f32 = 5.0;

    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            rect: Rect::from_center(pos, POWERUP_SIZE, POWERUP_SIZE),
            lifetime: POWERUP_LIFETIME,
            collected: false,
            bob_offset: 0.0,
        }
    }

    /// Count down the lifetime and bob up and down
    pub fn update(&mut self, dt: f32) {
        self.lifetime -= dt;
        self.bob_offset += Self::BOB_SPEED * dt;
        let bob_y = Self::BOB_AMPLITUDE * (self.bob_offset * 50.0).to_radians().cos();
        self.rect = Rect::from_center(
            Vec2::new(self.pos.x, self.pos.y + bob_y),
            POWERUP_SIZE,
            POWERUP_SIZE,
        );
    }

    /// One-shot latch: true only on the first overlapping call
    pub fn check_collision(&mut self, player_hitbox: &Rect) -> bool {
        if !self.collected && intersects(&self.rect, player_hitbox) {
            self.collected = true;
            return true;
        }
        false
    }

    /// Timed out or already collected
    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0 || self.collected
    }
}

/// Spawns, ages and collects power-ups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpManager {
    pub powerups: Vec<PowerUp>,
    spawn_timer: f32,
    next_id: u32,
}

impl PowerUpManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll for spawns, age every power-up and drop the expired ones
    pub fn update<R: Rng>(&mut self, dt: f32, columns: usize, rng: &mut R) {
        self.spawn_timer += dt;
        if self.spawn_timer >= POWERUP_SPAWN_INTERVAL {
            self.spawn_timer = 0.0;
            if rng.random_bool(POWERUP_SPAWN_CHANCE) {
                self.spawn_random(columns, rng);
            }
        }

        for powerup in &mut self.powerups {
            powerup.update(dt);
        }
        self.powerups.retain(|p| !p.is_expired());
    }

    /// Spawn one power-up of a random kind over a random column
    pub fn spawn_random<R: Rng>(&mut self, columns: usize, rng: &mut R) -> &PowerUp {
        // Column 0 is skipped so the sprite never hangs off the left edge
        let column = if columns > 1 {
            rng.random_range(1..columns)
        } else {
            0
        };
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        let pos = Vec2::new(
            column as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            GROUND_LEVEL - POWERUP_HOVER_HEIGHT,
        );
        self.spawn(kind, pos)
    }

    /// Place a power-up of `kind` centered at `pos`
    pub fn spawn(&mut self, kind: PowerUpKind, pos: Vec2) -> &PowerUp {
        let id = self.next_id;
        self.next_id += 1;
        log::debug!("Power-up {:?} spawned at ({:.0}, {:.0})", kind, pos.x, pos.y);
        self.powerups.push(PowerUp::new(id, kind, pos));
        &self.powerups[self.powerups.len() - 1]
    }

    /// Kinds collected by the player this call; each power-up reports once
    pub fn check_collisions(&mut self, player_hitbox: &Rect) -> Vec<PowerUpKind> {
        self.powerups
            .iter_mut()
            .filter_map(|p| p.check_collision(player_hitbox).then_some(p.kind))
            .collect()
    }

    pub fn clear(&mut self) {
        self.powerups.clear();
        self.spawn_timer = 0.0;
    }

    pub fn len(&self) -> usize {
        self.powerups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powerups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn hitbox_over(p: &PowerUp) -> Rect {
        Rect::from_center(p.rect.center(), 10.0, 10.0)
    }

    #[test]
    fn test_collection_latch() {
        let mut p = PowerUp::new(0, PowerUpKind::Shield, Vec2::new(200.0, 300.0));
        let hb = hitbox_over(&p);
        assert!(p.check_collision(&hb));
        assert!(!p.check_collision(&hb));
        assert!(p.collected);
        assert!(p.is_expired());
    }

    #[test]
    fn test_miss_does_not_collect() {
        let mut p = PowerUp::new(0, PowerUpKind::Shield, Vec2::new(200.0, 300.0));
        let far = Rect::new(600.0, 0.0, 10.0, 10.0);
        assert!(!p.check_collision(&far));
        assert!(!p.collected);
        assert!(!p.is_expired());
    }

    #[test]
    fn test_lifetime_expiry() {
        let mut mgr = PowerUpManager::new();
        mgr.spawn(PowerUpKind::SlowMotion, Vec2::new(100.0, 300.0));
        let mut rng = Pcg32::seed_from_u64(9);
        // Spawn chance still rolls every second; only track the first id
        for _ in 0..9 {
            mgr.update(1.0, 16, &mut rng);
        }
        assert!(mgr.powerups.iter().any(|p| p.id == 0));
        mgr.update(1.0, 16, &mut rng);
        assert!(mgr.powerups.iter().all(|p| p.id != 0));
    }

    #[test]
    fn test_bob_stays_within_amplitude() {
        let mut p = PowerUp::new(0, PowerUpKind::Shield, Vec2::new(200.0, 300.0));
        for _ in 0..200 {
            p.update(1.0 / 60.0);
            let dy = p.rect.center().y - 300.0;
            assert!(dy.abs() <= 5.0 + 1e-3);
            assert_eq!(p.rect.center().x, 200.0);
        }
    }

    #[test]
    fn test_collected_reported_once_then_removed() {
        let mut mgr = PowerUpManager::new();
        let hb = hitbox_over(mgr.spawn(PowerUpKind::ScoreMultiplier, Vec2::new(300.0, 340.0)));
        let mut rng = Pcg32::seed_from_u64(1);

        let got = mgr.check_collisions(&hb);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0], PowerUpKind::ScoreMultiplier);
        // Still in the list until the next update, but latched
        assert!(mgr.check_collisions(&hb).is_empty());

        // Expire on the same tick it is swept: removed exactly once
        mgr.powerups[0].lifetime = 0.001;
        mgr.update(0.01, 16, &mut rng);
        assert!(mgr.powerups.iter().all(|p| p.id != 0));
        assert!(mgr.check_collisions(&hb).is_empty());
    }

    #[test]
    fn test_spawn_position_range() {
        let mut mgr = PowerUpManager::new();
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..500 {
            let p = mgr.spawn_random(16, &mut rng);
            let col = ((p.pos.x - TILE_SIZE / 2.0) / TILE_SIZE) as usize;
            assert!((1..16).contains(&col));
            assert_eq!(p.pos.y, GROUND_LEVEL - POWERUP_HOVER_HEIGHT);
        }
        assert_eq!(mgr.len(), 500);
    }

    #[test]
    fn test_spawn_roll_once_per_second() {
        let mut mgr = PowerUpManager::new();
        let mut rng = Pcg32::seed_from_u64(77);
        // 20k seconds of rolls at 2% ~= 400 spawns; lifetime keeps them few
        let mut spawned = 0;
        for _ in 0..20_000 {
            let before = mgr.next_id;
            mgr.update(1.0, 16, &mut rng);
            spawned += (mgr.next_id - before) as usize;
        }
        assert!((300..=500).contains(&spawned), "spawned {spawned}");
        assert!(mgr.len() <= 10);
    }

    #[test]
    fn test_effect_dispatch() {
        let mut player = Player::spawn();
        let mut meteorites = vec![
            Meteorite::new(0, Vec2::new(0.0, 0.0), -8.0),
            Meteorite::new(1, Vec2::new(50.0, 0.0), -12.0),
        ];
        let mut score = ScoreManager::with_high_scores(HighScores::new(), None);

        let mut ctx = EffectContext {
            player: &mut player,
            meteorites: &mut meteorites,
            score: &mut score,
            now_ms: 1_000,
        };
        PowerUpKind::Shield.apply(&mut ctx);
        PowerUpKind::Shield.apply(&mut ctx);
        PowerUpKind::SlowMotion.apply(&mut ctx);
        PowerUpKind::ScoreMultiplier.apply(&mut ctx);

        assert!(player.has_shield);
        assert_eq!(meteorites[0].velocity, -4.0);
        assert_eq!(meteorites[1].velocity, -6.0);
        assert!(meteorites.iter().all(|m| m.slowed));
        assert_eq!(score.multiplier(), SCORE_MULTIPLIER);
        assert_eq!(score.multiplier_remaining_ms(1_000), MULTIPLIER_DURATION_MS);
    }
}
