//! Visual particles
//!
//! Purely cosmetic: nothing in the simulation reads particle state back.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Maximum particles
pub const MAX_PARTICLES: usize = 512;

/// What emitted the particle (renderer picks the colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Dust,
    Spark,
    Trail,
    Sparkle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

impl Particle {
    /// Remaining life as a 0-1 fade factor
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit<R: Rng>(
        &mut self,
        rng: &mut R,
        kind: ParticleKind,
        pos: Vec2,
        vel: (f32, f32, f32, f32),
        life: (f32, f32),
    ) {
        if self.particles.len() >= MAX_PARTICLES {
            return;
        }
        let (vx0, vx1, vy0, vy1) = vel;
        let life = rng.random_range(life.0..=life.1);
        self.particles.push(Particle {
            kind,
            pos,
            vel: Vec2::new(rng.random_range(vx0..=vx1), rng.random_range(vy0..=vy1)),
            life,
            max_life: life,
            size: rng.random_range(2.0..=5.0),
        });
    }

    /// Dust kicked up at the player's feet
    pub fn emit_jump<R: Rng>(&mut self, rng: &mut R, player_pos: Vec2) {
        for _ in 0..10 {
            let pos = Vec2::new(
                player_pos.x + rng.random_range(-20.0..=20.0),
                player_pos.y + PLAYER_SIZE,
            );
            self.emit(rng, ParticleKind::Dust, pos, (-2.0, 2.0, -1.0, 1.0), (0.2, 0.5));
        }
    }

    /// Burst of sparks at an impact point
    pub fn emit_collision<R: Rng>(&mut self, rng: &mut R, pos: Vec2) {
        for _ in 0..30 {
            self.emit(rng, ParticleKind::Spark, pos, (-5.0, 5.0, -8.0, -2.0), (0.5, 1.5));
        }
    }

    /// Single ember behind a falling meteorite (`pos` = sprite top-left)
    pub fn emit_meteorite_trail<R: Rng>(&mut self, rng: &mut R, pos: Vec2) {
        let half = METEORITE_SIZE / 2.0;
        let pos = Vec2::new(
            pos.x + half + rng.random_range(-5.0..=5.0),
            pos.y + half + rng.random_range(-5.0..=5.0),
        );
        self.emit(rng, ParticleKind::Trail, pos, (-0.5, 0.5, -1.0, 1.0), (0.3, 0.8));
    }

    /// Sparkles where a power-up was picked up
    pub fn emit_powerup_collect<R: Rng>(&mut self, rng: &mut R, pos: Vec2) {
        for _ in 0..20 {
            self.emit(rng, ParticleKind::Sparkle, pos, (-4.0, 4.0, -6.0, -1.0), (0.4, 1.0));
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.life -= dt;
            p.pos += p.vel * dt * FRAME_SCALE;
            p.vel.y += 0.2;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
