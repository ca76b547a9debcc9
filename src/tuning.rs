//! Game balance parameters
//!
//! Everything tweakable lives here so a session can be built from JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier on the first spawn interval
    pub fn spawn_interval_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.5,
        }
    }

    /// Multiplier on slime contact drain
    pub fn drain_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    /// Arrows carried
    pub fn arrow_count(&self) -> usize {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Normal => ARROW_COUNT,
            Difficulty::Hard => 2,
        }
    }
}

/// Gameplay tuning for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: Difficulty,

    // === World ===
    /// Grid width in cells
    pub world_width: u32,
    /// Grid height in cells
    pub world_height: u32,
    pub cell_size: f32,
    /// Solid stones scattered over the floor
    pub stone_count: u32,

    // === Hero ===
    pub hero_start: Vec2,
    pub hero_max_speed: f32,
    pub hero_accel: f32,
    pub hero_max_health: f32,

    // === Arrows ===
    pub arrow_count: usize,
    pub arrow_speed: f32,
    /// Seconds to draw a new arrow
    pub arrow_draw_delay: f32,
    /// Share of hero velocity added to a released arrow
    pub arrow_inherit: f32,

    // === Slimes ===
    pub slime_count: usize,
    /// Health per second drained on contact
    pub slime_drain_rate: f32,
    pub spawn_interval: f32,
    pub spawn_acceleration: f32,
    pub spawn_min_interval: f32,
    /// Minimum spawn distance from the hero
    pub spawn_clearance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            cell_size: CELL_SIZE,
            stone_count: 0,

            hero_start: Vec2::new(HERO_START_X, HERO_START_Y),
            hero_max_speed: HERO_MAX_SPEED,
            hero_accel: HERO_ACCEL,
            hero_max_health: HERO_MAX_HEALTH,

            arrow_count: ARROW_COUNT,
            arrow_speed: ARROW_SPEED,
            arrow_draw_delay: ARROW_DRAW_DELAY,
            arrow_inherit: ARROW_INHERIT,

            slime_count: SLIME_COUNT,
            slime_drain_rate: SLIME_DRAIN_RATE,
            spawn_interval: SPAWN_INTERVAL,
            spawn_acceleration: SPAWN_ACCELERATION,
            spawn_min_interval: SPAWN_MIN_INTERVAL,
            spawn_clearance: SLIME_SPAWN_CLEARANCE,
        }
    }
}

impl Tuning {
    /// Create tuning from a difficulty preset (applies preset defaults)
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut tuning = Self::default();
        tuning.apply_difficulty(difficulty);
        tuning
    }

    /// Apply a difficulty preset on top of the normal defaults
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.spawn_interval = SPAWN_INTERVAL * difficulty.spawn_interval_scale();
        self.slime_drain_rate = SLIME_DRAIN_RATE * difficulty.drain_scale();
        self.arrow_count = difficulty.arrow_count();
    }

    /// Parse and validate; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Size of the world in world units
    pub fn world_extent(&self) -> Vec2 {
        Vec2::new(
            self.world_width as f32 * self.cell_size,
            self.world_height as f32 * self.cell_size,
        )
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            if ok {
                Ok(())
            } else {
                Err(TuningError::Invalid { field, reason })
            }
        }

        check(self.world_width >= 3, "world_width", "needs at least 3 cells")?;
        check(self.world_height >= 3, "world_height", "needs at least 3 cells")?;
        check(
            self.world_width as u64 * self.world_height as u64 <= MAX_WORLD_CELLS,
            "world_width",
            "world has too many cells",
        )?;
        check(self.cell_size > 0.0, "cell_size", "must be positive")?;
        let interior = (self.world_width as u64 - 2) * (self.world_height as u64 - 2);
        check(
            self.stone_count as u64 <= interior,
            "stone_count",
            "more stones than interior cells",
        )?;

        let lo = self.cell_size;
        let hi = Vec2::new(
            (self.world_width as f32 - 2.0) * self.cell_size,
            (self.world_height as f32 - 2.0) * self.cell_size,
        );
        let start = self.hero_start;
        check(
            start.x >= lo && start.y >= lo && start.x <= hi.x && start.y <= hi.y,
            "hero_start",
            "must lie inside the walls",
        )?;
        check(self.hero_max_speed > 0.0, "hero_max_speed", "must be positive")?;
        check(self.hero_accel > 0.0, "hero_accel", "must be positive")?;
        check(self.hero_max_health > 0.0, "hero_max_health", "must be positive")?;

        check(self.arrow_count > 0, "arrow_count", "needs at least one arrow")?;
        check(self.arrow_speed > 0.0, "arrow_speed", "must be positive")?;
        check(self.arrow_draw_delay >= 0.0, "arrow_draw_delay", "must not be negative")?;

        check(self.slime_count > 0, "slime_count", "needs at least one slime")?;
        check(self.slime_drain_rate >= 0.0, "slime_drain_rate", "must not be negative")?;
        check(self.spawn_interval > 0.0, "spawn_interval", "must be positive")?;
        check(self.spawn_acceleration >= 0.0, "spawn_acceleration", "must not be negative")?;
        check(self.spawn_min_interval > 0.0, "spawn_min_interval", "must be positive")?;
        check(self.spawn_clearance >= 0.0, "spawn_clearance", "must not be negative")?;
        Ok(())
    }
}
