//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. Nothing in this module touches a window,
//! a GPU or the clock:
//! - Frame delta comes in through [`tick`]
//! - Seeded RNG only
//! - Stable iteration order (pool slot order)

pub mod arrow;
pub mod entity;
pub mod hero;
pub mod pool;
pub mod rect;
pub mod slime;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod world;

pub use arrow::{Arrow, ArrowState};
pub use entity::{Entity, Sprite, Tint};
pub use hero::Hero;
pub use pool::{Pooled, Recycler, SpawnSchedule, first_free};
pub use rect::{Rect, intersects};
pub use slime::Slime;
pub use snapshot::{DrawItem, Hud};
pub use state::{GamePhase, GameState, Quiver};
pub use tick::{TickInput, tick};
pub use world::{Cell, TileWorld};
