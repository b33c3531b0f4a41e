//! Ragdoll death animation
//!
//! When the player dies the sprite is replaced by six loose limbs thrown
//! from the player's last position. Each limb bounces on the ground with
//! restitution and friction until it settles; once every limb is resting
//! the animation is finished.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use crate::consts::*;

/// Fraction of vertical speed kept (and inverted) on ground contact
pub const RESTITUTION: f32 = 0.3;
/// Fraction of horizontal and angular speed kept on ground contact
pub const FRICTION: f32 = 0.8;
/// Below these speeds a bouncing limb comes to rest
const REST_SPEED_Y: f32 = 1.0;
const REST_SPEED_X: f32 = 0.5;

/// Body part of the ragdoll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimbKind {
    Head,
    Torso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl LimbKind {
    pub const ALL: [LimbKind; 6] = [
        LimbKind::Head,
        LimbKind::Torso,
        LimbKind::LeftArm,
        LimbKind::RightArm,
        LimbKind::LeftLeg,
        LimbKind::RightLeg,
    ];

    /// (offset from player rect origin, limb size)
    fn layout(self) -> (Vec2, Vec2) {
        match self {
            LimbKind::Head => (Vec2::new(25.0, 10.0), Vec2::new(20.0, 20.0)),
            LimbKind::Torso => (Vec2::new(25.0, 35.0), Vec2::new(15.0, 30.0)),
            LimbKind::LeftArm => (Vec2::new(15.0, 30.0), Vec2::new(8.0, 20.0)),
            LimbKind::RightArm => (Vec2::new(35.0, 30.0), Vec2::new(8.0, 20.0)),
            LimbKind::LeftLeg => (Vec2::new(20.0, 55.0), Vec2::new(8.0, 25.0)),
            LimbKind::RightLeg => (Vec2::new(30.0, 55.0), Vec2::new(8.0, 25.0)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagdollLimb {
    pub kind: LimbKind,
    pub body: PhysicsBody,
    pub size: Vec2,
    /// Degrees
    pub angle: f32,
    pub angular_vel: f32,
}

impl RagdollLimb {
    fn new<R: Rng>(kind: LimbKind, origin: Vec2, rng: &mut R) -> Self {
        let (offset, size) = kind.layout();
        let mut body = PhysicsBody::new(origin + offset);
        body.vel = Vec2::new(rng.random_range(-5.0..=5.0), rng.random_range(-10.0..=-5.0));
        Self {
            kind,
            body,
            size,
            angle: 0.0,
            angular_vel: rng.random_range(-20.0..=20.0),
        }
    }

    #[inline]
    pub fn grounded(&self) -> bool {
        self.body.grounded
    }

    pub fn update(&mut self, dt: f32) {
        if self.body.grounded {
            return;
        }
        self.body.integrate(dt, GRAVITY, MAX_FALL_SPEED);
        self.angle += self.angular_vel * dt * 10.0;

        if self.body.at_ground(GROUND_LEVEL) {
            // Bounce: invert and damp vertical speed, bleed off the rest
            self.body.pos.y = GROUND_LEVEL;
            self.body.vel.y *= -RESTITUTION;
            self.body.vel.x *= FRICTION;
            self.angular_vel *= FRICTION;

            if self.body.vel.y.abs() < REST_SPEED_Y && self.body.vel.x.abs() < REST_SPEED_X {
                self.body.land(GROUND_LEVEL);
                self.body.vel = Vec2::ZERO;
                self.angular_vel = 0.0;
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ragdoll {
    pub limbs: Vec<RagdollLimb>,
    pub finished: bool,
}

impl Ragdoll {
    /// Throw the limbs out from the player's last sprite position
    pub fn new<R: Rng>(player_pos: Vec2, rng: &mut R) -> Self {
        let limbs = LimbKind::ALL
            .iter()
            .map(|&kind| RagdollLimb::new(kind, player_pos, rng))
            .collect();
        Self {
            limbs,
            finished: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        for limb in &mut self.limbs {
            limb.update(dt);
        }
        self.finished = self.limbs.iter().all(RagdollLimb::grounded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_six_limbs_at_offsets() {
        let mut rng = Pcg32::seed_from_u64(1);
        let origin = Vec2::new(100.0, GROUND_LEVEL);
        let ragdoll = Ragdoll::new(origin, &mut rng);
        assert_eq!(ragdoll.limbs.len(), 6);
        assert!(!ragdoll.finished);

        let head = &ragdoll.limbs[0];
        assert_eq!(head.kind, LimbKind::Head);
        assert_eq!(head.body.pos, origin + Vec2::new(25.0, 10.0));
        for limb in &ragdoll.limbs {
            assert!((-5.0..=5.0).contains(&limb.body.vel.x));
            assert!((-10.0..=-5.0).contains(&limb.body.vel.y));
            assert!((-20.0..=20.0).contains(&limb.angular_vel));
        }
    }

    #[test]
    fn test_bounce_inverts_and_damps() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut limb = RagdollLimb::new(LimbKind::Head, Vec2::ZERO, &mut rng);
        limb.body.pos = Vec2::new(0.0, GROUND_LEVEL - 1.0);
        limb.body.vel = Vec2::new(4.0, 10.0);
        limb.update(1.0 / 60.0);

        assert_eq!(limb.body.pos.y, GROUND_LEVEL);
        // 10 + 1 gravity = 11, bounced to -3.3
        assert!((limb.body.vel.y - (-3.3)).abs() < 1e-4);
        assert!((limb.body.vel.x - 3.2).abs() < 1e-4);
        assert!(!limb.grounded());
    }

    #[test]
    fn test_ragdoll_settles() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ragdoll = Ragdoll::new(Vec2::new(300.0, GROUND_LEVEL), &mut rng);
        for _ in 0..2_000 {
            ragdoll.update(1.0 / 60.0);
            if ragdoll.finished {
                break;
            }
        }
        assert!(ragdoll.finished);
        for limb in &ragdoll.limbs {
            assert_eq!(limb.body.pos.y, GROUND_LEVEL);
            assert_eq!(limb.body.vel, Vec2::ZERO);
        }
    }
}
