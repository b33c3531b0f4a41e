//! Shared physics integration
//!
//! Player, meteorites and ragdoll limbs all move with the same step:
//! accumulate gravity, clamp the fall speed, advance the position. Every
//! term is scaled by [`FRAME_SCALE`] so tuning values read as "per frame at
//! 60 fps" regardless of the real tick rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Position/velocity pair with a resting flag
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Resting on the ground; grounded bodies are not integrated
    pub grounded: bool,
}

impl PhysicsBody {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            grounded: false,
        }
    }

    /// Advance one tick. No-op while grounded.
    ///
    /// Post-condition: `vel.y <= max_fall_speed`.
    pub fn integrate(&mut self, dt: f32, gravity: f32, max_fall_speed: f32) {
        if self.grounded {
            return;
        }
        let dt = dt.max(0.0);
        self.vel.y += gravity * dt * FRAME_SCALE;
        self.vel.y = self.vel.y.min(max_fall_speed);
        self.pos += self.vel * dt * FRAME_SCALE;
    }

    /// Whether the body has reached (or passed) `ground`
    #[inline]
    pub fn at_ground(&self, ground: f32) -> bool {
        self.pos.y >= ground
    }

    /// Snap onto `ground`, stop vertical motion and mark as resting
    pub fn land(&mut self, ground: f32) {
        self.pos.y = ground;
        self.vel.y = 0.0;
        self.grounded = true;
    }
}
