//! Spatial and visual state shared by every actor

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Named colors the renderer multiplies sprites with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tint {
    #[default]
    White,
    PeachPuff,
    RosyBrown,
    Brown,
    Red,
    Goldenrod,
    Gold,
    /// Killed slime left on the floor
    DarkRed,
}

impl Tint {
    pub fn rgba(self) -> [u8; 4] {
        match self {
            Tint::White => [255, 255, 255, 255],
            Tint::PeachPuff => [255, 218, 185, 255],
            Tint::RosyBrown => [188, 143, 143, 255],
            Tint::Brown => [165, 42, 42, 255],
            Tint::Red => [255, 0, 0, 255],
            Tint::Goldenrod => [218, 165, 32, 255],
            Tint::Gold => [255, 215, 0, 255],
            Tint::DarkRed => [139, 0, 0, 255],
        }
    }
}

/// Which sprite the renderer should draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sprite {
    Hero,
    Bow,
    Arrow,
    StuckArrow,
    Slime,
}

/// Base entity: position, orientation, scale, tint and a local collider
#[derive(Debug, Clone)]
pub struct Entity {
    pub sprite: Sprite,
    pub pos: Vec2,
    pub angle: f32,
    /// Non-uniform scale (x, y)
    pub scale: Vec2,
    pub tint: Tint,
    /// Collider relative to `pos`
    pub collider: Rect,
    /// Participates in simulation
    pub active: bool,
    /// Participates in rendering
    pub visible: bool,
}

impl Entity {
    pub fn new(sprite: Sprite, pos: Vec2, collider: Rect) -> Self {
        Self {
            sprite,
            pos,
            angle: 0.0,
            scale: Vec2::ONE,
            tint: Tint::White,
            collider,
            active: true,
            visible: true,
        }
    }

    /// Collider in world space
    #[inline]
    pub fn abs_collider(&self) -> Rect {
        self.collider.moved(self.pos)
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.visible = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.visible = false;
    }
}
