//! Quiver - simulation core of a top-down archery arcade game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (hero, arrows, slimes, tile world)
//! - `tuning`: Data-driven game balance
//!
//! Windowing, input polling, sprites and cameras live outside this crate.
//! The core takes a [`sim::TickInput`] plus a frame delta and hands back
//! a draw list and HUD state.

pub mod sim;
pub mod tuning;

pub use tuning::{Difficulty, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World defaults (in cells)
    pub const WORLD_WIDTH: u32 = 40;
    pub const WORLD_HEIGHT: u32 = 25;
    /// Edge length of one grid cell (and one sprite)
    pub const CELL_SIZE: f32 = 16.0;
    /// Largest grid a session will allocate
    pub const MAX_WORLD_CELLS: u64 = 1 << 20;
    /// Number of decorative floor variants
    pub const FLOOR_VARIANTS: u8 = 3;

    /// Hero defaults
    pub const HERO_START_X: f32 = 48.0;
    pub const HERO_START_Y: f32 = 100.0;
    pub const HERO_MAX_SPEED: f32 = 90.0;
    pub const HERO_ACCEL: f32 = 400.0;
    pub const HERO_MAX_HEALTH: f32 = 100.0;

    /// Arrow starts this far from the center of the hero
    pub const ARROW_START_DISTANCE: f32 = 10.0;
    pub const ARROW_SPEED: f32 = 150.0;
    /// Share of the hero velocity an arrow inherits on release
    pub const ARROW_INHERIT: f32 = 0.22;
    /// Flight height below which an arrow can kill
    pub const ARROW_KILL_HEIGHT: f32 = 8.0;
    pub const ARROW_MAX_HEIGHT: f32 = 100.0;
    pub const ARROW_COUNT: usize = 3;
    /// Seconds needed to pull the next arrow out of the quiver
    pub const ARROW_DRAW_DELAY: f32 = 1.0;
    /// Launch requests closer than this to the hero have no flight path
    pub const ARROW_MIN_FLIGHT: f32 = 0.001;

    /// Slime defaults
    pub const SLIME_COUNT: usize = 200;
    pub const SLIME_DRAIN_RATE: f32 = 120.0;
    /// Hero velocity multiplier applied on every frame of slime contact
    pub const SLIME_SLOW_DOWN: f32 = 0.7;
    /// Slimes feel the hero inside this radius
    pub const SLIME_SENSE_RADIUS: f32 = 92.0;
    /// Slimes latch their heading inside this radius
    pub const SLIME_LATCH_RADIUS: f32 = 48.0;
    /// Attraction turns into repulsion past this distance
    pub const SLIME_SWEET_SPOT: f32 = 42.0;
    /// Spawns never land closer than this to the hero
    pub const SLIME_SPAWN_CLEARANCE: f32 = 64.0;
    pub const SLIME_SPAWN_ATTEMPTS: u32 = 64;

    /// Slime spawn schedule
    pub const SPAWN_INTERVAL: f32 = 8.0;
    pub const SPAWN_ACCELERATION: f32 = 0.01;
    pub const SPAWN_MIN_INTERVAL: f32 = 0.5;
}

/// Angle of a vector in radians, measured from +X
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Unit vector from `from` toward `to`, zero when the points coincide
#[inline]
pub fn unit_or_zero(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
