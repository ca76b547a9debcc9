//! Static tile grid the hero, arrows and slimes collide against
//!
//! Cell `(x, y)` occupies a `cell_size` square centered on
//! `(x * cell_size, y * cell_size)`. The outer ring is always wall.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::FLOOR_VARIANTS;

/// Collision class of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Stone,
}

impl Cell {
    #[inline]
    pub fn is_solid(self) -> bool {
        self != Cell::Empty
    }
}

/// The tile world, generated once per session
#[derive(Debug, Clone)]
pub struct TileWorld {
    width: u32,
    height: u32,
    cell_size: f32,
    /// Row-major, `y * width + x`
    cells: Vec<Cell>,
    /// Floor sprite variant per cell (drawing only)
    decoration: Vec<u8>,
}

impl TileWorld {
    /// Build a walled grid with an empty interior
    pub fn generate(width: u32, height: u32, cell_size: f32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut cells = vec![Cell::Empty; width as usize * height as usize];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    cells[y as usize * width as usize + x as usize] = Cell::Wall;
                }
            }
        }
        Self {
            width,
            height,
            cell_size,
            decoration: vec![0; cells.len()],
            cells,
        }
    }

    /// Roll a floor variant for every cell
    pub fn decorate<R: Rng>(&mut self, rng: &mut R) {
        for variant in &mut self.decoration {
            *variant = rng.random_range(0..FLOOR_VARIANTS);
        }
    }

    /// Turn up to `count` random interior cells into stone, leaving a
    /// `clearance` radius around `keep_clear` walkable
    pub fn scatter_stones<R: Rng>(
        &mut self,
        rng: &mut R,
        count: u32,
        keep_clear: Vec2,
        clearance: f32,
    ) -> u32 {
        if self.width < 3 || self.height < 3 {
            return 0;
        }
        let interior = (self.width - 2).saturating_mul(self.height - 2);
        let target = count.min(interior);
        let mut placed = 0;
        let mut attempts = target.saturating_mul(8);
        while placed < target && attempts > 0 {
            attempts -= 1;
            let x = rng.random_range(1..self.width - 1);
            let y = rng.random_range(1..self.height - 1);
            let idx = self.index(x, y);
            if self.cells[idx] != Cell::Empty {
                continue;
            }
            let center = self.cell_center(x, y);
            if center.distance(keep_clear) < clearance + self.cell_size {
                continue;
            }
            self.cells[idx] = Cell::Stone;
            placed += 1;
        }
        if placed < count {
            log::warn!("Placed {placed} of {count} stones");
        }
        placed
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell at grid coordinates, `None` outside the grid
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.cells[self.index(x as u32, y as u32)])
    }

    pub fn decoration(&self, x: u32, y: u32) -> u8 {
        self.decoration
            .get(self.index(x, y))
            .copied()
            .unwrap_or(0)
    }

    pub fn cell_center(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(x as f32 * self.cell_size, y as f32 * self.cell_size)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Grid index a world coordinate falls under
    #[inline]
    fn space_to_grid(&self, a: f32) -> i64 {
        (a / self.cell_size).floor() as i64
    }

    /// Obstacle rectangles of every solid cell near `query`
    ///
    /// The covered index range is clamped to the grid, so queries that
    /// hang off the world only see the cells that exist.
    pub fn colliders_near(&self, query: &Rect) -> Vec<Rect> {
        let mut out = Vec::new();
        self.colliders_near_into(query, &mut out);
        out
    }

    /// Same as [`colliders_near`](Self::colliders_near), writing into `buf`
    pub fn colliders_near_into(&self, query: &Rect, buf: &mut Vec<Rect>) {
        buf.clear();
        let max_x = self.width as i64 - 1;
        let max_y = self.height as i64 - 1;
        let x1 = self.space_to_grid(query.min.x).max(0);
        let y1 = self.space_to_grid(query.min.y).max(0);
        let x2 = (self.space_to_grid(query.max.x) + 1).min(max_x);
        let y2 = (self.space_to_grid(query.max.y) + 1).min(max_y);
        if x1 > x2 || y1 > y2 {
            return;
        }
        for x in x1..=x2 {
            for y in y1..=y2 {
                let cell = self.cells[self.index(x as u32, y as u32)];
                if cell.is_solid() {
                    buf.push(Rect::centered(
                        self.cell_center(x as u32, y as u32),
                        self.cell_size,
                    ));
                }
            }
        }
    }

    /// Whether `rect` overlaps any solid cell
    pub fn blocked(&self, rect: &Rect) -> bool {
        self.colliders_near(rect).iter().any(|c| c.intersects(rect))
    }

    /// Uniform point over the playable interior (one-cell margin)
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> Vec2 {
        let lo = self.cell_size;
        let hi_x = (self.width as f32 - 2.0) * self.cell_size;
        let hi_y = (self.height as f32 - 2.0) * self.cell_size;
        let x = if hi_x > lo { rng.random_range(lo..hi_x) } else { lo };
        let y = if hi_y > lo { rng.random_range(lo..hi_y) } else { lo };
        Vec2::new(x, y)
    }

    /// Whether a point lies inside the playable interior
    pub fn in_interior(&self, p: Vec2) -> bool {
        let lo = self.cell_size;
        let hi_x = (self.width as f32 - 2.0) * self.cell_size;
        let hi_y = (self.height as f32 - 2.0) * self.cell_size;
        p.x >= lo && p.y >= lo && p.x <= hi_x && p.y <= hi_y
    }
}
