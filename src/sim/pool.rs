//! Fixed-size entity pools and the slime spawn clock
//!
//! Pools are allocated once; entities are reactivated instead of created.

use serde::{Deserialize, Serialize};

use super::arrow::Arrow;
use super::slime::Slime;

/// Anything that can sit unused in a pool
pub trait Pooled {
    fn is_free(&self) -> bool;
}

impl Pooled for Slime {
    fn is_free(&self) -> bool {
        !self.entity.active
    }
}

impl Pooled for Arrow {
    fn is_free(&self) -> bool {
        !self.entity.active
    }
}

/// Index of the first free slot
pub fn first_free<T: Pooled>(pool: &[T]) -> Option<usize> {
    pool.iter().position(Pooled::is_free)
}

/// Slot allocation that never fails: first free slot, otherwise evict
/// slots in round-robin order
#[derive(Debug, Clone, Default)]
pub struct Recycler {
    cursor: usize,
}

impl Recycler {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }

    /// Slot to use next, or `None` for an empty pool
    pub fn acquire<T: Pooled>(&mut self, pool: &[T]) -> Option<usize> {
        if let Some(free) = first_free(pool) {
            return Some(free);
        }
        if pool.is_empty() {
            return None;
        }
        let slot = self.cursor % pool.len();
        self.cursor = (slot + 1) % pool.len();
        log::debug!("Pool full, recycling slot {slot}");
        Some(slot)
    }
}

/// Spawn clock whose interval shrinks as the session goes on
///
/// `next(t)` schedules the following trigger at
/// `t + max(base - t * acceleration, min_interval)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnSchedule {
    pub base_interval: f32,
    pub acceleration: f32,
    pub min_interval: f32,
    /// Interval picked by the last `next` call
    pub current_interval: f32,
}

impl SpawnSchedule {
    pub fn new(base_interval: f32, acceleration: f32, min_interval: f32) -> Self {
        Self {
            base_interval,
            acceleration,
            min_interval,
            current_interval: base_interval,
        }
    }

    /// Trigger time following elapsed time `t`
    pub fn next(&mut self, t: f32) -> f32 {
        self.current_interval = (self.base_interval - t * self.acceleration).max(self.min_interval);
        t + self.current_interval
    }
}
