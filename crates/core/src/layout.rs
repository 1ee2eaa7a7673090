//! Layout module - grid <-> world coordinate mapping
//!
//! Pure affine transform used by the calling layer to place block sprites and
//! to route pointer clicks back into grid positions. It holds no board state.

use crate::types::Position;

/// Cell geometry for a `rows x columns` board centered on `origin`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub rows: u8,
    pub columns: u8,
    /// Edge length of one cell in world units
    pub cell_size: f32,
    /// Gap between neighboring cells
    pub spacing: f32,
    /// World position of the board center
    pub origin: (f32, f32),
}

impl GridLayout {
    pub fn new(rows: u8, columns: u8, cell_size: f32, spacing: f32, origin: (f32, f32)) -> Self {
        Self {
            rows,
            columns,
            cell_size,
            spacing,
            origin,
        }
    }

    /// Distance between the centers of two neighboring cells
    pub fn pitch(&self) -> f32 {
        self.cell_size + self.spacing
    }

    fn contains(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as i32) < self.columns as i32
            && (pos.y as i32) < self.rows as i32
    }

    /// World-space center of the cell at `pos`, `None` when out of bounds
    pub fn to_world(&self, pos: Position) -> Option<(f32, f32)> {
        if !self.contains(pos) {
            return None;
        }
        let pitch = self.pitch();
        let half_w = (self.columns as f32 - 1.0) * 0.5;
        let half_h = (self.rows as f32 - 1.0) * 0.5;
        Some((
            self.origin.0 + (pos.x as f32 - half_w) * pitch,
            self.origin.1 + (pos.y as f32 - half_h) * pitch,
        ))
    }

    /// Grid cell under a world point. Points in the spacing gap between cells
    /// or outside the board map to `None`.
    pub fn from_world(&self, world: (f32, f32)) -> Option<Position> {
        let pitch = self.pitch();
        if pitch <= 0.0 || !world.0.is_finite() || !world.1.is_finite() {
            return None;
        }
        let half_w = (self.columns as f32 - 1.0) * 0.5;
        let half_h = (self.rows as f32 - 1.0) * 0.5;
        let fx = (world.0 - self.origin.0) / pitch + half_w;
        let fy = (world.1 - self.origin.1) / pitch + half_h;

        let cx = fx.round();
        let cy = fy.round();
        if cx < 0.0 || cy < 0.0 || cx >= self.columns as f32 || cy >= self.rows as f32 {
            return None;
        }

        // Reject points that land in the gap around the cell square.
        let reach = self.cell_size * 0.5 / pitch;
        if (fx - cx).abs() > reach || (fy - cy).abs() > reach {
            return None;
        }

        Some(Position::new(cx as i8, cy as i8))
    }
}
