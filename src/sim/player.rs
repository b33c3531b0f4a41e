//! The player character
//!
//! Horizontal motion is set straight from held keys each tick (no
//! acceleration). Jumping is edge-triggered: holding the jump key never
//! produces a second jump until it has been released.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::collision::Rect;
use crate::consts::*;

/// Raw held-key state for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Facing / animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerPose {
    #[default]
    IdleRight,
    IdleLeft,
    RunningRight,
    RunningLeft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: PhysicsBody,
    /// Collision rectangle, kept at `pos + hitbox offset`
    pub hitbox: Rect,
    /// Jump latch, re-armed only when the jump key is up
    pub can_jump: bool,
    pub has_shield: bool,
    pub pose: PlayerPose,
}

impl Player {
    const HITBOX_OFFSET: Vec2 = Vec2::new(PLAYER_HITBOX_OFFSET_X, PLAYER_HITBOX_OFFSET_Y);

    pub fn new(pos: Vec2) -> Self {
        let mut player = Self {
            body: PhysicsBody::new(pos),
            hitbox: Rect::new(0.0, 0.0, PLAYER_HITBOX_WIDTH, PLAYER_HITBOX_HEIGHT),
            can_jump: true,
            has_shield: false,
            pose: PlayerPose::IdleRight,
        };
        player.sync_hitbox();
        player
    }

    /// Player at the standard start position, standing on the ground
    pub fn spawn() -> Self {
        Self::new(Vec2::new(PLAYER_START_X, GROUND_LEVEL))
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn grounded(&self) -> bool {
        self.body.grounded
    }

    /// Visual rectangle (sprite bounds)
    pub fn rect(&self) -> Rect {
        Rect::new(self.body.pos.x, self.body.pos.y, PLAYER_SIZE, PLAYER_SIZE)
    }

    /// Advance one tick. Returns true if a jump started this tick.
    pub fn update(&mut self, input: PlayerInput, dt: f32) -> bool {
        let jumped = self.handle_input(input);
        self.apply_physics(dt);
        self.sync_hitbox();
        jumped
    }

    fn handle_input(&mut self, input: PlayerInput) -> bool {
        let grounded = self.body.grounded;
        let pos = self.body.pos;

        let mut dx = 0.0;
        if input.left && pos.x > 0.0 {
            dx = -PLAYER_SPEED;
            if grounded {
                self.pose = PlayerPose::RunningLeft;
            }
        } else if input.right && pos.x < SCREEN_WIDTH - PLAYER_SIZE {
            dx = PLAYER_SPEED;
            if grounded {
                self.pose = PlayerPose::RunningRight;
            }
        } else if grounded {
            self.pose = match self.pose {
                PlayerPose::RunningLeft => PlayerPose::IdleLeft,
                PlayerPose::RunningRight => PlayerPose::IdleRight,
                idle => idle,
            };
        }
        self.body.vel.x = dx;

        let mut jumped = false;
        if input.jump && self.can_jump && grounded {
            self.body.vel.y = JUMP_VELOCITY;
            self.body.grounded = false;
            self.can_jump = false;
            jumped = true;
        }
        if !input.jump {
            self.can_jump = true;
        }
        jumped
    }

    fn apply_physics(&mut self, dt: f32) {
        // The player is re-evaluated against the ground every tick, so clear
        // the resting flag before integrating and let the ground test set it.
        self.body.grounded = false;
        self.body.integrate(dt, GRAVITY, MAX_FALL_SPEED);
        if self.body.at_ground(GROUND_LEVEL) {
            self.body.land(GROUND_LEVEL);
        }
    }

    /// Recompute the hitbox from the current position
    pub fn sync_hitbox(&mut self) {
        self.hitbox.place_at(self.body.pos, Self::HITBOX_OFFSET);
    }
}
