//! Arrow flight and lifecycle
//!
//! Arrows live in 2D but fake a ballistic arc: the flight is a straight line
//! from launch point to target, and the arrow's scale grows toward the
//! midpoint and shrinks again as it "falls". An arrow can only kill once it
//! is close to the ground again.
//!
//! Lifecycle: `InQuiver -> InHand -> Flying -> Stuck -> InQuiver`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Sprite, Tint};
use super::rect::{Rect, intersects};
use super::world::TileWorld;
use crate::angle_of;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrowState {
    InQuiver,
    InHand,
    Flying,
    Stuck,
}

#[derive(Debug, Clone)]
pub struct Arrow {
    pub entity: Entity,
    pub state: ArrowState,
    pub vel: Vec2,
    /// Where the arrow should drop down
    pub target: Vec2,
    /// Position the flight started from
    pub launch: Vec2,
    /// Half the distance from launch point to target
    pub half_distance: f32,
    pub max_height: f32,
    base_scale: f32,
    speed: f32,
}

impl Arrow {
    /// New inactive arrow flying at `speed` once fired
    pub fn new(speed: f32) -> Self {
        let mut entity = Entity::new(Sprite::Arrow, Vec2::ZERO, Rect::new(-1.0, -1.0, 1.0, 1.0));
        entity.tint = Tint::Goldenrod;
        entity.deactivate();
        Self {
            entity,
            state: ArrowState::InQuiver,
            vel: Vec2::ZERO,
            target: Vec2::ZERO,
            launch: Vec2::ZERO,
            half_distance: 0.0,
            max_height: 0.0,
            base_scale: 1.0,
            speed,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.entity.pos
    }

    #[inline]
    pub fn abs_collider(&self) -> Rect {
        self.entity.abs_collider()
    }

    pub fn distance_to_target(&self) -> f32 {
        self.entity.pos.distance(self.target)
    }

    /// Position along the flight mapped to 0 ... 1 ... 0, peaking halfway
    pub fn distance_from_ends(&self) -> f32 {
        if self.half_distance <= 0.0 {
            return 0.0;
        }
        let d = self.distance_to_target();
        ((self.half_distance - (d - self.half_distance).abs()) / self.half_distance).clamp(0.0, 1.0)
    }

    pub fn current_height(&self) -> f32 {
        self.max_height * self.distance_from_ends().sqrt()
    }

    /// Low enough to hit something on the ground
    pub fn can_kill(&self) -> bool {
        self.state == ArrowState::Flying && self.current_height() < ARROW_KILL_HEIGHT
    }

    pub fn kills(&self, target: &Rect) -> bool {
        self.can_kill() && intersects(target, &self.abs_collider())
    }

    /// Sprite the renderer should use for the current state
    pub fn sprite(&self) -> Sprite {
        match self.state {
            ArrowState::Stuck => Sprite::StuckArrow,
            _ => Sprite::Arrow,
        }
    }

    pub fn to_hands(&mut self) {
        self.entity.activate();
        self.state = ArrowState::InHand;
    }

    pub fn to_quiver(&mut self) {
        self.entity.activate();
        self.state = ArrowState::InQuiver;
    }

    pub fn stick(&mut self) {
        if self.state != ArrowState::Stuck {
            log::debug!("Arrow stuck at {:?}", self.entity.pos);
        }
        self.state = ArrowState::Stuck;
    }

    /// Hold the arrow nocked between the hero and the cursor
    pub fn attach_to_hands(&mut self, from: Vec2, to: Vec2) {
        let dir = (to - from).normalize_or_zero();
        self.entity.pos = from + dir * ARROW_START_DISTANCE;
        self.entity.angle = angle_of(dir);
        self.entity.scale = Vec2::splat(self.base_scale);
    }

    /// Park the arrow on the hero's back, fanned out by slot
    pub fn attach_to_quiver(&mut self, pos: Vec2, slot: usize) {
        self.entity.pos = pos + Vec2::new(-8.0 + 3.0 * slot as f32, 7.0);
        self.entity.angle = std::f32::consts::FRAC_PI_2;
        self.entity.scale = Vec2::splat(self.base_scale * 0.5);
    }

    /// Release toward `to`. `relational` is added to the launch velocity.
    ///
    /// A target on top of the launch point has no flight path; the arrow
    /// drops straight to the ground instead.
    pub fn fire(&mut self, from: Vec2, to: Vec2, relational: Vec2) {
        let dir = (to - from).normalize_or_zero();
        self.entity.activate();
        self.entity.pos = from + dir * ARROW_START_DISTANCE;
        self.entity.angle = angle_of(dir);
        self.entity.scale = Vec2::splat(self.base_scale);
        self.launch = self.entity.pos;
        self.target = to;
        self.half_distance = self.entity.pos.distance(to) / 2.0;
        self.max_height = (self.half_distance / 1.2).clamp(0.0, ARROW_MAX_HEIGHT);
        self.vel = dir * self.speed + relational;

        if dir == Vec2::ZERO || self.half_distance < ARROW_MIN_FLIGHT {
            self.half_distance = 0.0;
            self.max_height = 0.0;
            self.vel = Vec2::ZERO;
            self.stick();
            return;
        }
        self.state = ArrowState::Flying;
    }

    /// Advance a flying arrow one frame
    pub fn update(&mut self, dt: f32, world: &TileWorld) {
        if !self.entity.active || self.state != ArrowState::Flying {
            return;
        }
        let size = self.distance_from_ends().sqrt();
        let old_dist = self.distance_to_target();
        self.entity.pos += self.vel * dt;
        let new_dist = self.distance_to_target();

        // Short shots should not rise high into the air
        let mut perspect = self.max_height / 150.0;
        if new_dist < self.half_distance {
            // smaller close to the target since the arrow drops to the floor
            perspect += (self.half_distance - new_dist) / self.half_distance / 5.0;
        }
        let lift = size * self.max_height / 100.0;
        self.entity.scale = Vec2::new(self.base_scale + lift - perspect, self.base_scale + lift);

        if new_dist > old_dist {
            self.stick();
            return;
        }
        let col = self.abs_collider();
        if world.colliders_near(&col).iter().any(|wall| intersects(&col, wall)) {
            self.stick();
        }
    }
}
