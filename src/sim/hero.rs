//! The player-controlled hero
//!
//! Movement is acceleration limited per axis, capped on the diagonal, and
//! slides along walls by dropping whichever axis runs into them.

use glam::Vec2;

use super::entity::{Entity, Sprite, Tint};
use super::rect::Rect;
use super::world::TileWorld;

/// Collider of a 16x16 hero sprite: a little narrower than the frame,
/// shorter at the top
pub fn hero_collider(cell_size: f32) -> Rect {
    let w = cell_size / 2.5;
    Rect::new(-w, -w, w, cell_size / 3.0)
}

/// Body tint for a health percentage. Anything above 0 and below 25 is
/// Brown; there is no separate near-death tint.
pub fn tint_for_health(pct: f32) -> Tint {
    if pct >= 80.0 {
        Tint::White
    } else if pct >= 50.0 {
        Tint::PeachPuff
    } else if pct >= 25.0 {
        Tint::RosyBrown
    } else if pct > 0.0 {
        Tint::Brown
    } else {
        Tint::Red
    }
}

/// Map a movement intent component to -1, 0 or 1
#[inline]
fn axis(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Accelerate toward `intent * max`, or brake toward zero without overshooting
fn step_axis(vel: f32, intent: f32, daccel: f32, max: f32) -> f32 {
    let next = if intent != 0.0 {
        vel + intent * daccel
    } else if vel >= daccel {
        vel - daccel
    } else if vel <= -daccel {
        vel + daccel
    } else {
        0.0
    };
    next.clamp(-max, max)
}

#[derive(Debug, Clone)]
pub struct Hero {
    pub entity: Entity,
    pub vel: Vec2,
    pub max_speed: f32,
    pub accel: f32,
    pub health: f32,
    pub max_health: f32,
}

impl Hero {
    pub fn new(pos: Vec2, collider: Rect, max_speed: f32, accel: f32, max_health: f32) -> Self {
        Self {
            entity: Entity::new(Sprite::Hero, pos, collider),
            vel: Vec2::ZERO,
            max_speed,
            accel,
            health: max_health,
            max_health,
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

    pub fn alive(&self) -> bool {
        self.health > 0.0
    }

    /// Health as a percentage of max
    pub fn health_pct(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health * 100.0
        } else {
            0.0
        }
    }

    /// Add signed health (negative hurts), clamped to `[0, max_health]`
    pub fn damage(&mut self, amount: f32) {
        if !self.alive() {
            return;
        }
        self.health = (self.health + amount).clamp(0.0, self.max_health);
        if !self.alive() {
            log::info!("Hero died at {:?}", self.entity.pos);
        }
    }

    /// Scale velocity down by `rate` (0..1)
    pub fn slow_down(&mut self, rate: f32) {
        self.vel *= rate;
    }

    /// Advance one frame with the given movement intent
    pub fn update(&mut self, dt: f32, intent: Vec2, world: &TileWorld) {
        self.entity.tint = tint_for_health(self.health_pct());
        if !self.alive() {
            return;
        }

        let daccel = self.accel * dt;
        self.vel.x = step_axis(self.vel.x, axis(intent.x), daccel, self.max_speed);
        self.vel.y = step_axis(self.vel.y, axis(intent.y), daccel, self.max_speed);

        // limit diagonal speed
        let speed = self.vel.length();
        if speed > self.max_speed {
            self.vel *= self.max_speed / speed;
        }

        let mut delta = self.vel * dt;
        let col = self.abs_collider();
        for wall in world.colliders_near(&col.swept(delta)) {
            if delta == Vec2::ZERO {
                break;
            }
            // Already overlapping (e.g. placed inside a wall): let it walk out
            if col.intersects(&wall) || !col.moved(delta).intersects(&wall) {
                continue;
            }
            let no_y = Vec2::new(delta.x, 0.0);
            if !col.moved(no_y).intersects(&wall) {
                self.vel.y = 0.0;
                delta = no_y;
                continue;
            }
            let no_x = Vec2::new(0.0, delta.y);
            if !col.moved(no_x).intersects(&wall) {
                self.vel.x = 0.0;
                delta = no_x;
                continue;
            }
            self.vel = Vec2::ZERO;
            delta = Vec2::ZERO;
        }
        self.entity.pos += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn open_world() -> TileWorld {
        TileWorld::generate(64, 64, 16.0)
    }

    fn hero_at(pos: Vec2) -> Hero {
        Hero::new(pos, hero_collider(16.0), 90.0, 400.0, 100.0)
    }

    #[test]
    fn test_accelerates_to_max_and_holds() {
        let world = open_world();
        let mut hero = hero_at(Vec2::new(200.0, 500.0));
        let mut last = 0.0;
        for _ in 0..10 {
            hero.update(0.1, Vec2::new(1.0, 0.0), &world);
            assert!(hero.vel.x >= last);
            assert!(hero.vel.x <= 90.0);
            last = hero.vel.x;
        }
        assert_eq!(hero.vel.x, 90.0);
        assert_eq!(hero.vel.y, 0.0);
    }

    #[test]
    fn test_brakes_to_exact_zero() {
        let world = open_world();
        let mut hero = hero_at(Vec2::new(500.0, 500.0));
        hero.vel = Vec2::new(50.0, -30.0);
        for _ in 0..30 {
            hero.update(0.05, Vec2::ZERO, &world);
        }
        assert_eq!(hero.vel, Vec2::ZERO);
    }

    #[test]
    fn test_diagonal_speed_capped() {
        let world = open_world();
        let mut hero = hero_at(Vec2::new(500.0, 500.0));
        for _ in 0..20 {
            hero.update(0.1, Vec2::new(1.0, 1.0), &world);
        }
        assert!(hero.vel.length() <= 90.0 + 1e-3);
        assert!((hero.vel.x - hero.vel.y).abs() < 1e-3);
    }

    #[test]
    fn test_slides_along_wall() {
        let world = TileWorld::generate(20, 20, 16.0);
        // Right wall cell column x=19 spans [296, 312]; collider half width 6.4
        let mut hero = hero_at(Vec2::new(288.0, 150.0));
        for _ in 0..30 {
            hero.update(0.05, Vec2::new(1.0, 1.0), &world);
        }
        assert!(hero.abs_collider().max.x < 296.0);
        assert!(hero.pos().y > 150.0, "hero should keep sliding up the wall");
        assert_eq!(hero.vel.x, 0.0);
    }

    #[test]
    fn test_blocked_by_floor_wall() {
        let world = TileWorld::generate(20, 20, 16.0);
        let mut hero = hero_at(Vec2::new(100.0, 20.0));
        for _ in 0..30 {
            hero.update(0.05, Vec2::new(0.0, -1.0), &world);
        }
        // Bottom wall row spans y in [-8, 8]
        assert!(hero.abs_collider().min.y > 8.0);
    }

    #[test]
    fn test_damage_and_death() {
        let world = open_world();
        let mut hero = hero_at(Vec2::new(300.0, 300.0));
        hero.damage(-30.0);
        assert_eq!(hero.health, 70.0);
        hero.damage(500.0);
        assert_eq!(hero.health, 100.0);
        hero.damage(-1000.0);
        assert_eq!(hero.health, 0.0);
        assert!(!hero.alive());
        hero.damage(50.0);
        assert_eq!(hero.health, 0.0, "dead heroes do not heal");

        let before = hero.pos();
        hero.update(0.1, Vec2::new(1.0, 0.0), &world);
        assert_eq!(hero.pos(), before);
        assert_eq!(hero.entity.tint, Tint::Red);
    }

    #[test]
    fn test_health_tint_bands() {
        assert_eq!(tint_for_health(100.0), Tint::White);
        assert_eq!(tint_for_health(80.0), Tint::White);
        assert_eq!(tint_for_health(60.0), Tint::PeachPuff);
        assert_eq!(tint_for_health(30.0), Tint::RosyBrown);
        assert_eq!(tint_for_health(20.0), Tint::Brown);
        assert_eq!(tint_for_health(5.0), Tint::Brown);
        assert_eq!(tint_for_health(0.0), Tint::Red);
    }

    #[test]
    fn test_slow_down() {
        let mut hero = hero_at(Vec2::ZERO);
        hero.vel = Vec2::new(80.0, -40.0);
        hero.slow_down(0.5);
        assert_eq!(hero.vel, Vec2::new(40.0, -20.0));
    }

    fn arb_intent() -> impl Strategy<Value = Vec2> {
        (-1i8..=1, -1i8..=1).prop_map(|(x, y)| Vec2::new(x as f32, y as f32))
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_max(
            steps in prop::collection::vec((arb_intent(), 0.001f32..0.2), 1..60)
        ) {
            let world = open_world();
            let mut hero = hero_at(Vec2::new(500.0, 500.0));
            for (intent, dt) in steps {
                hero.update(dt, intent, &world);
                prop_assert!(hero.vel.length() <= hero.max_speed + 1e-3);
            }
        }

        #[test]
        fn prop_health_stays_in_range(hits in prop::collection::vec(-500.0f32..500.0, 0..40)) {
            let mut hero = hero_at(Vec2::ZERO);
            for amount in hits {
                hero.damage(amount);
                prop_assert!(hero.health >= 0.0 && hero.health <= hero.max_health);
            }
        }
    }
}
