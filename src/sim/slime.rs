//! Slimes: homing enemies that drain the hero on contact
//!
//! Close to the hero a slime latches its heading and keeps it, only softly
//! steered toward the hero, so it orbits and overshoots instead of jittering
//! on top of its target. Around the hero there is an attraction band: slimes
//! speed up as they enter it and slow down near the middle.

use glam::Vec2;
use rand::Rng;

use super::arrow::Arrow;
use super::entity::{Entity, Sprite, Tint};
use super::hero::Hero;
use super::rect::Rect;
use super::world::TileWorld;
use crate::consts::*;
use crate::unit_or_zero;

#[derive(Debug, Clone)]
pub struct Slime {
    pub entity: Entity,
    pub speed: f32,
    /// Health drained from the hero per second of contact
    pub drain_rate: f32,
    /// Spin rate in radians per second
    pub rotation: f32,
    pub fixed_direction: Vec2,
    pub fixed: bool,
    /// Not killed since the last spawn
    pub alive: bool,
}

impl Slime {
    /// New inactive slime sized for the given grid
    pub fn new(cell_size: f32, drain_rate: f32) -> Self {
        let s = cell_size / 2.5;
        let mut entity = Entity::new(Sprite::Slime, Vec2::ZERO, Rect::new(-s, -s, s, s));
        entity.tint = Tint::Red;
        entity.deactivate();
        Self {
            entity,
            speed: 40.0,
            drain_rate,
            rotation: 0.0,
            fixed_direction: Vec2::ZERO,
            fixed: false,
            alive: false,
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

    /// (Re)activate at `pos` with a freshly rolled spin and speed.
    /// Later spawns are faster.
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, pos: Vec2, elapsed: f32) {
        self.entity.pos = pos;
        self.entity.angle = 0.0;
        self.entity.tint = Tint::Red;
        self.entity.activate();
        self.rotation = rng.random::<f32>() + 0.2;
        self.speed = self.rotation * 40.0 + 30.0 + elapsed / 10.0;
        self.fixed = false;
        self.fixed_direction = Vec2::ZERO;
        self.alive = true;
    }

    /// Stop simulating; the body stays on the floor until recycled
    pub fn kill(&mut self) {
        self.alive = false;
        self.entity.active = false;
        self.entity.tint = Tint::DarkRed;
    }

    /// Advance one frame. Returns true if an arrow killed the slime.
    pub fn update(&mut self, dt: f32, hero: &mut Hero, arrows: &mut [Arrow], world: &TileWorld) -> bool {
        if !self.entity.active {
            return false;
        }

        let mut dir = unit_or_zero(self.entity.pos, hero.pos());
        if self.fixed {
            // Stick to the latched heading until out of range
            dir = (self.fixed_direction + dir * 0.5).normalize_or_zero();
        }
        let delta = dir * self.speed * dt;
        self.entity.pos += delta;
        self.entity.angle += (self.rotation + 0.2) * dt;

        let mut wall_collided = false;
        let col = self.abs_collider();
        if col.intersects(&hero.abs_collider()) {
            hero.damage(-self.drain_rate * dt);
            hero.slow_down(SLIME_SLOW_DOWN);
        } else if world.colliders_near(&col).iter().any(|wall| wall.intersects(&col)) {
            self.entity.pos -= delta;
            wall_collided = true;
            self.fixed = false;
        }

        let diff = hero.pos().distance(self.entity.pos);
        if diff <= SLIME_SENSE_RADIUS && !wall_collided {
            if diff < SLIME_LATCH_RADIUS && !self.fixed {
                self.fixed_direction = dir;
                self.fixed = true;
            }
            // Speed up entering the band, slow down near its middle
            let rate = (SLIME_SWEET_SPOT - diff) / SLIME_SENSE_RADIUS;
            self.entity.pos -= delta * rate;
        } else if self.fixed {
            self.fixed = false;
        }

        if diff < SLIME_SENSE_RADIUS {
            self.entity.angle += (SLIME_SENSE_RADIUS - diff) / 300.0;
        }

        let col = self.abs_collider();
        let mut killed = false;
        for arrow in arrows.iter_mut() {
            if arrow.kills(&col) {
                arrow.stick();
                killed = true;
            }
        }
        if killed {
            self.kill();
        }
        killed
    }
}
