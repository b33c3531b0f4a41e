//! Falling meteorites

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::collision::{Rect, intersects};
use crate::consts::*;

/// A falling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteorite {
    pub id: u32,
    pub body: PhysicsBody,
    /// Fall velocity; negative values move downward
    pub velocity: f32,
    /// Caught by a slow-motion pickup
    pub slowed: bool,
    /// Collision rectangle, centered on the sprite
    pub hitbox: Rect,
    /// Sprite rotation (degrees) and spin per tick
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Meteorite {
    const HITBOX_OFFSET: Vec2 = Vec2::new(
        (METEORITE_SIZE - METEORITE_HITBOX_WIDTH) / 2.0,
        (METEORITE_SIZE - METEORITE_HITBOX_HEIGHT) / 2.0,
    );

    pub fn new(id: u32, pos: Vec2, velocity: f32) -> Self {
        let mut meteorite = Self {
            id,
            body: PhysicsBody::new(pos),
            velocity,
            slowed: false,
            hitbox: Rect::new(0.0, 0.0, METEORITE_HITBOX_WIDTH, METEORITE_HITBOX_HEIGHT),
            rotation: 0.0,
            rotation_speed: 0.0,
        };
        meteorite.sync_hitbox();
        meteorite
    }

    /// Spawn above the screen in a random tile column in `[0, columns - 1]`.
    ///
    /// `columns` must be at least 1; `World` guarantees this.
    pub fn spawn<R: Rng>(id: u32, columns: usize, velocity: f32, rng: &mut R) -> Self {
        let column = rng.random_range(0..columns.max(1));
        let pos = Vec2::new(column as f32 * TILE_SIZE, -METEORITE_SIZE);
        let mut meteorite = Self::new(id, pos, velocity);
        meteorite.rotation = rng.random_range(0.0..360.0);
        meteorite.rotation_speed = rng.random_range(-5.0..=5.0);
        meteorite
    }

    #[inline]
    pub fn grounded(&self) -> bool {
        self.body.grounded
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Visual rectangle
    pub fn rect(&self) -> Rect {
        Rect::new(self.body.pos.x, self.body.pos.y, METEORITE_SIZE, METEORITE_SIZE)
    }

    /// Fall one tick. Returns true on the tick it reaches the ground.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.body.grounded {
            return false;
        }
        // Constant-speed fall: no gravity, velocity is driven by `velocity`
        self.body.vel = Vec2::new(0.0, -self.velocity);
        self.body.integrate(dt, 0.0, MAX_FALL_SPEED);
        self.rotation = (self.rotation + self.rotation_speed).rem_euclid(360.0);
        self.sync_hitbox();

        if self.body.at_ground(GROUND_LEVEL) {
            self.body.land(GROUND_LEVEL);
            self.sync_hitbox();
            return true;
        }
        false
    }

    /// Hitbox overlap test; grounded meteorites are harmless
    pub fn check_collision(&self, player_hitbox: &Rect) -> bool {
        !self.body.grounded && intersects(&self.hitbox, player_hitbox)
    }

    fn sync_hitbox(&mut self) {
        self.hitbox.place_at(self.body.pos, Self::HITBOX_OFFSET);
    }
}
