//! What the renderer needs from a session, copied out once per frame
//!
//! Draw order matches layering on screen: slime bodies, arrows stuck in the
//! ground, live slimes, the bow, carried and flying arrows, the hero.

use glam::Vec2;
use serde::Serialize;

use super::arrow::ArrowState;
use super::entity::{Entity, Sprite, Tint};
use super::state::{GamePhase, GameState};

/// One sprite to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawItem {
    pub sprite: Sprite,
    pub pos: Vec2,
    pub angle: f32,
    pub scale: Vec2,
    pub tint: Tint,
}

impl DrawItem {
    fn of(entity: &Entity) -> Self {
        Self {
            sprite: entity.sprite,
            pos: entity.pos,
            angle: entity.angle,
            scale: entity.scale,
            tint: entity.tint,
        }
    }
}

/// Scalar state for the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    pub score: u64,
    pub kills: u32,
    pub arrows_available: usize,
    pub elapsed: f32,
    pub phase: GamePhase,
}

impl GameState {
    /// Visible entities in back-to-front order
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut items = Vec::with_capacity(self.slimes.len() + self.arrows.len() + 2);

        for slime in &self.slimes {
            if slime.entity.visible && !slime.alive {
                items.push(DrawItem::of(&slime.entity));
            }
        }
        for arrow in &self.arrows {
            if arrow.entity.visible && arrow.state == ArrowState::Stuck {
                items.push(DrawItem {
                    sprite: arrow.sprite(),
                    ..DrawItem::of(&arrow.entity)
                });
            }
        }
        for slime in &self.slimes {
            if slime.entity.visible && slime.alive {
                items.push(DrawItem::of(&slime.entity));
            }
        }
        if self.hero.alive() && self.bow.visible {
            items.push(DrawItem::of(&self.bow));
        }
        for arrow in &self.arrows {
            if arrow.entity.visible && arrow.state != ArrowState::Stuck {
                items.push(DrawItem {
                    sprite: arrow.sprite(),
                    ..DrawItem::of(&arrow.entity)
                });
            }
        }
        if self.hero.entity.visible {
            items.push(DrawItem::of(&self.hero.entity));
        }
        items
    }

    pub fn hud(&self) -> Hud {
        Hud {
            health: self.hero.health,
            max_health: self.hero.max_health,
            alive: self.hero.alive(),
            score: self.score,
            kills: self.kills,
            arrows_available: self.quiver.available(),
            elapsed: self.elapsed,
            phase: self.phase,
        }
    }
}
