//! Session state and core simulation types
//!
//! One `GameState` owns the world, the hero and both pools. Nothing here is
//! global; tests can run as many sessions side by side as they like.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arrow::{Arrow, ArrowState};
use super::entity::{Entity, Sprite, Tint};
use super::hero::{Hero, hero_collider};
use super::pool::{Recycler, SpawnSchedule, first_free};
use super::rect::Rect;
use super::slime::Slime;
use super::world::TileWorld;
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};
use crate::{angle_of, unit_or_zero};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    /// Hero is dead; the world keeps running without player input
    GameOver,
}

/// Arrows the hero carries: a LIFO quiver plus at most one arrow in hand
#[derive(Debug, Clone, Default)]
pub struct Quiver {
    /// Indices into `GameState::arrows`, top of the quiver last
    pub stack: Vec<usize>,
    pub in_hand: Option<usize>,
    /// Elapsed time at which the next arrow can be drawn
    pub draw_ready_at: f32,
}

impl Quiver {
    /// Arrows not currently out in the world
    pub fn available(&self) -> usize {
        self.stack.len() + self.in_hand.is_some() as usize
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Seconds simulated so far (monotonic, paused time excluded)
    pub elapsed: f32,
    pub frame: u64,
    pub score: u64,
    pub kills: u32,
    pub world: TileWorld,
    pub hero: Hero,
    /// Drawn between hero and cursor while the hero lives
    pub bow: Entity,
    pub arrows: Vec<Arrow>,
    pub quiver: Quiver,
    pub slimes: Vec<Slime>,
    pub spawn_schedule: SpawnSchedule,
    pub next_spawn_at: f32,
    pub recycler: Recycler,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a new session after validating `tuning`
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut world = TileWorld::generate(tuning.world_width, tuning.world_height, tuning.cell_size);
        world.decorate(&mut rng);
        if tuning.stone_count > 0 {
            world.scatter_stones(&mut rng, tuning.stone_count, tuning.hero_start, tuning.spawn_clearance);
        }

        let hero = Hero::new(
            tuning.hero_start,
            hero_collider(tuning.cell_size),
            tuning.hero_max_speed,
            tuning.hero_accel,
            tuning.hero_max_health,
        );

        let mut bow = Entity::new(Sprite::Bow, tuning.hero_start, Rect::centered(Vec2::ZERO, 0.0));
        bow.tint = Tint::Gold;

        let mut arrows: Vec<Arrow> = (0..tuning.arrow_count)
            .map(|_| Arrow::new(tuning.arrow_speed))
            .collect();
        let mut quiver = Quiver {
            stack: Vec::with_capacity(arrows.len()),
            in_hand: None,
            draw_ready_at: tuning.arrow_draw_delay,
        };
        while let Some(i) = first_free(&arrows) {
            arrows[i].to_quiver();
            quiver.stack.push(i);
        }

        let slimes = (0..tuning.slime_count)
            .map(|_| Slime::new(tuning.cell_size, tuning.slime_drain_rate))
            .collect();

        let mut spawn_schedule = SpawnSchedule::new(
            tuning.spawn_interval,
            tuning.spawn_acceleration,
            tuning.spawn_min_interval,
        );
        let next_spawn_at = spawn_schedule.next(0.0);

        log::info!(
            "New session seed={} world={}x{} arrows={} slimes={} ({})",
            seed,
            tuning.world_width,
            tuning.world_height,
            tuning.arrow_count,
            tuning.slime_count,
            tuning.difficulty.as_str(),
        );

        let mut state = Self {
            seed,
            rng,
            tuning,
            phase: GamePhase::Playing,
            elapsed: 0.0,
            frame: 0,
            score: 0,
            kills: 0,
            world,
            hero,
            bow,
            arrows,
            quiver,
            slimes,
            spawn_schedule,
            next_spawn_at,
            recycler: Recycler::new(),
        };
        state.attach_carried_arrows(state.hero.pos());
        state
    }

    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Slimes currently hunting
    pub fn live_slimes(&self) -> usize {
        self.slimes.iter().filter(|s| s.alive).count()
    }

    pub fn arrows_in(&self, state: ArrowState) -> usize {
        self.arrows.iter().filter(|a| a.state == state).count()
    }

    /// Move the top arrow of the quiver into the hand once the draw
    /// delay has passed
    pub fn draw_arrow(&mut self) -> bool {
        if self.quiver.in_hand.is_some() || self.elapsed <= self.quiver.draw_ready_at {
            return false;
        }
        let Some(idx) = self.quiver.stack.pop() else {
            return false;
        };
        self.arrows[idx].to_hands();
        self.quiver.in_hand = Some(idx);
        true
    }

    /// Release the arrow in hand toward `target`
    pub fn fire(&mut self, target: Vec2) -> bool {
        let Some(idx) = self.quiver.in_hand.take() else {
            return false;
        };
        let relational = self.hero.vel * self.tuning.arrow_inherit;
        self.arrows[idx].fire(self.hero.pos(), target, relational);
        if !self.quiver.stack.is_empty() {
            self.quiver.draw_ready_at = self.elapsed + self.tuning.arrow_draw_delay;
        }
        log::debug!("Fired arrow {idx} at {target:?}");
        true
    }

    /// Pick up stuck arrows the hero walks over. Returns how many.
    pub fn recover_arrows(&mut self) -> usize {
        let hero_col = self.hero.abs_collider();
        let mut recovered = 0;
        for (i, arrow) in self.arrows.iter_mut().enumerate() {
            if arrow.state == ArrowState::Stuck && arrow.abs_collider().intersects(&hero_col) {
                if self.quiver.stack.is_empty() {
                    self.quiver.draw_ready_at = self.elapsed + self.tuning.arrow_draw_delay;
                }
                arrow.to_quiver();
                self.quiver.stack.push(i);
                recovered += 1;
            }
        }
        recovered
    }

    /// Place carried arrows on the hero: nocked toward `cursor`, the rest on
    /// the back
    pub fn attach_carried_arrows(&mut self, cursor: Vec2) {
        let hero_pos = self.hero.pos();
        let mut slot = 0;
        for arrow in &mut self.arrows {
            match arrow.state {
                ArrowState::InHand => arrow.attach_to_hands(hero_pos, cursor),
                ArrowState::InQuiver => {
                    arrow.attach_to_quiver(hero_pos, slot);
                    slot += 1;
                }
                _ => {}
            }
        }
    }

    /// Point the bow at `cursor`
    pub fn aim_bow(&mut self, cursor: Vec2) {
        let dir = unit_or_zero(self.hero.pos(), cursor);
        self.bow.pos = self.hero.pos() + dir * (ARROW_START_DISTANCE - 3.0);
        self.bow.angle = angle_of(dir);
    }

    /// Spawn point at least `spawn_clearance` away from the hero and off
    /// solid cells, or `None` once the attempts run out
    fn spawn_point(&mut self) -> Option<Vec2> {
        let hero_pos = self.hero.pos();
        let size = self.tuning.cell_size / 1.25;
        for _ in 0..SLIME_SPAWN_ATTEMPTS {
            let p = self.world.random_point(&mut self.rng);
            if hero_pos.distance(p) >= self.tuning.spawn_clearance
                && !self.world.blocked(&Rect::centered(p, size))
            {
                return Some(p);
            }
        }
        None
    }

    /// Activate a slime, recycling the oldest slot if the pool is full.
    /// Skips the spawn when no clear point is found.
    pub fn spawn_slime(&mut self) -> Option<usize> {
        let Some(pos) = self.spawn_point() else {
            log::warn!(
                "No spawn point {:.0} units clear of the hero after {} attempts, skipping",
                self.tuning.spawn_clearance,
                SLIME_SPAWN_ATTEMPTS
            );
            return None;
        };
        let slot = self.recycler.acquire(&self.slimes)?;
        let elapsed = self.elapsed;
        self.slimes[slot].spawn(&mut self.rng, pos, elapsed);
        log::debug!("Spawned slime {slot} at {pos:?} (speed {:.1})", self.slimes[slot].speed);
        Some(slot)
    }

    /// Points for a kill: farther and later kills are worth more
    pub fn kill_score(&self, slime_pos: Vec2) -> u64 {
        (slime_pos.distance(self.hero.pos()) * (1.0 + self.elapsed / 1000.0)).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.arrows.len(), ARROW_COUNT);
        assert_eq!(state.quiver.stack.len(), ARROW_COUNT);
        assert_eq!(state.quiver.available(), ARROW_COUNT);
        assert!(state.arrows.iter().all(|a| a.state == ArrowState::InQuiver && a.entity.active));
        assert_eq!(state.slimes.len(), SLIME_COUNT);
        assert!(state.slimes.iter().all(|s| !s.entity.active));
        assert_eq!(state.next_spawn_at, SPAWN_INTERVAL);
        assert_eq!(state.hero.pos(), Vec2::new(HERO_START_X, HERO_START_Y));
    }

    #[test]
    fn test_with_tuning_validates() {
        let mut tuning = Tuning::default();
        tuning.arrow_count = 0;
        assert!(GameState::with_tuning(1, tuning).is_err());

        let mut tuning = Tuning::default();
        tuning.arrow_count = 5;
        let state = GameState::with_tuning(1, tuning).unwrap();
        assert_eq!(state.quiver.available(), 5);
    }

    #[test]
    fn test_draw_waits_for_delay() {
        let mut state = GameState::new(1);
        assert!(!state.draw_arrow());
        state.elapsed = ARROW_DRAW_DELAY + 0.01;
        assert!(state.draw_arrow());
        assert_eq!(state.quiver.stack.len(), ARROW_COUNT - 1);
        assert!(state.quiver.in_hand.is_some());
        assert!(!state.draw_arrow(), "hand is full");
    }

    #[test]
    fn test_fire_and_recover() {
        let mut state = GameState::new(1);
        state.elapsed = 2.0;
        state.draw_arrow();
        let idx = state.quiver.in_hand.unwrap();
        assert!(state.fire(state.hero.pos() + Vec2::new(100.0, 0.0)));
        assert_eq!(state.arrows[idx].state, ArrowState::Flying);
        assert_eq!(state.quiver.available(), ARROW_COUNT - 1);
        assert!(!state.fire(Vec2::ZERO), "nothing left in hand");

        // Drop the arrow on the hero
        state.arrows[idx].stick();
        state.arrows[idx].entity.pos = state.hero.pos();
        assert_eq!(state.recover_arrows(), 1);
        assert_eq!(state.arrows[idx].state, ArrowState::InQuiver);
        assert_eq!(state.quiver.available(), ARROW_COUNT);
    }

    #[test]
    fn test_spawn_keeps_clear_of_hero() {
        let mut state = GameState::new(9);
        for _ in 0..50 {
            let slot = state.spawn_slime().unwrap();
            let slime = &state.slimes[slot];
            assert!(slime.alive && slime.entity.active);
            assert!(slime.pos().distance(state.hero.pos()) >= SLIME_SPAWN_CLEARANCE);
            assert!(state.world.in_interior(slime.pos()));
        }
        assert_eq!(state.live_slimes(), 50);
    }

    #[test]
    fn test_spawn_recycles_when_full() {
        let mut tuning = Tuning::default();
        tuning.slime_count = 2;
        let mut state = GameState::with_tuning(3, tuning).unwrap();
        assert_eq!(state.spawn_slime(), Some(0));
        assert_eq!(state.spawn_slime(), Some(1));
        assert_eq!(state.spawn_slime(), Some(0));
        assert_eq!(state.spawn_slime(), Some(1));
        assert_eq!(state.live_slimes(), 2);
    }

    #[test]
    fn test_spawn_skipped_when_clearance_unreachable() {
        let mut tuning = Tuning::default();
        tuning.spawn_clearance = 800.0;
        let mut state = GameState::with_tuning(4, tuning).unwrap();
        for _ in 0..10 {
            assert_eq!(state.spawn_slime(), None);
        }
        assert_eq!(state.live_slimes(), 0);
        assert!(state.slimes.iter().all(|s| !s.entity.active));
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new(77);
        let b = GameState::new(77);
        for y in 0..a.world.height() {
            for x in 0..a.world.width() {
                assert_eq!(a.world.decoration(x, y), b.world.decoration(x, y));
            }
        }
    }

    #[test]
    fn test_kill_score() {
        let mut state = GameState::new(1);
        let p = state.hero.pos() + Vec2::new(100.0, 0.0);
        assert_eq!(state.kill_score(p), 100);
        state.elapsed = 500.0;
        assert_eq!(state.kill_score(p), 150);
    }
}
