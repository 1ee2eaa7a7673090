//! Grid module - owns the board cells
//!
//! The grid is a `rows x columns` matrix stored as a flat, fixed-capacity
//! array in **column-major** order (`x * rows + y`), so each column is a
//! contiguous slice and gravity is a per-slice stable partition.
//!
//! Coordinates: `(x, y)` with `x` in `0..columns` and `y` in `0..rows`,
//! `y = 0` being the bottom row. Every position-taking method validates bounds
//! and degrades to `None`/`false`/no-op for out-of-range input.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::types::{Cell, Color, Position, MAX_CELLS, MAX_COLORS, MAX_DIMENSION};

/// A block that slid down during gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockFall {
    pub from: Position,
    pub to: Position,
    pub color: Color,
}

/// The board grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: u8,
    columns: u8,
    /// Flat array of cells, column-major order (x * rows + y)
    cells: [Cell; MAX_CELLS],
}

impl Grid {
    /// Create an empty grid. Dimensions are clamped to `1..=10`.
    pub fn new(rows: u8, columns: u8) -> Self {
        let clamped_rows = rows.clamp(1, MAX_DIMENSION);
        let clamped_columns = columns.clamp(1, MAX_DIMENSION);
        if clamped_rows != rows || clamped_columns != columns {
            debug!(
                rows,
                columns, clamped_rows, clamped_columns, "grid dimensions clamped"
            );
        }
        Self {
            rows: clamped_rows,
            columns: clamped_columns,
            cells: [None; MAX_CELLS],
        }
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if !self.is_valid(pos) {
            return None;
        }
        Some((pos.x as usize) * (self.rows as usize) + (pos.y as usize))
    }

    #[inline(always)]
    fn position_of(&self, idx: usize) -> Position {
        let rows = self.rows as usize;
        Position::new((idx / rows) as i8, (idx % rows) as i8)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// Number of cells in use (`rows * columns`)
    pub fn len(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// A grid always has at least one cell
    pub fn is_empty(&self) -> bool {
        false
    }

    /// `0 <= x < columns && 0 <= y < rows`
    pub fn is_valid(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.columns as i8 && pos.y < self.rows as i8
    }

    /// Color at `pos`; `None` for empty or out-of-bounds
    pub fn get(&self, pos: Position) -> Option<Color> {
        self.index(pos).and_then(|idx| self.cells[idx])
    }

    /// Raw cell at `pos`; the outer `None` means out of bounds
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Set cell at `pos`. Returns false (and changes nothing) if out of bounds.
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => {
                debug!(x = pos.x, y = pos.y, "set ignored: position out of bounds");
                false
            }
        }
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    /// Swap the contents of two cells. No-op if either is out of bounds.
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Active cells in storage order
    pub fn cells(&self) -> &[Cell] {
        &self.cells[..self.len()]
    }

    /// Cells of column `x`, bottom to top
    pub fn column(&self, x: i8) -> Option<&[Cell]> {
        if x < 0 || x >= self.columns as i8 {
            return None;
        }
        let rows = self.rows as usize;
        let start = x as usize * rows;
        Some(&self.cells[start..start + rows])
    }

    /// All positions in sweep order: column-major, bottom to top
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.len()).map(move |idx| self.position_of(idx))
    }

    /// Occupied cells in sweep order
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Color)> + '_ {
        self.cells()
            .iter()
            .enumerate()
            .filter_map(move |(idx, cell)| cell.map(|color| (self.position_of(idx), color)))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells().iter().filter(|c| c.is_some()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.len() - self.occupied_count()
    }

    /// Number of blocks per color, indexed by [`Color::index`]
    pub fn color_counts(&self) -> [usize; MAX_COLORS as usize] {
        let mut counts = [0usize; MAX_COLORS as usize];
        for color in self.cells().iter().flatten() {
            counts[color.index() as usize] += 1;
        }
        counts
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Compact every column toward `y = 0`, preserving the relative order of
    /// blocks. Returns the moves performed (empty when already settled).
    pub fn apply_gravity(&mut self) -> Vec<BlockFall> {
        let mut falls = Vec::new();
        for x in 0..self.columns as i8 {
            self.settle_column(x, &mut falls);
        }
        falls
    }

    /// Stable partition of one column: occupied cells first, gaps on top.
    fn settle_column(&mut self, x: i8, falls: &mut Vec<BlockFall>) {
        let rows = self.rows as usize;
        let start = x as usize * rows;
        let column = &mut self.cells[start..start + rows];

        let mut write_y = 0usize;
        for read_y in 0..rows {
            let Some(color) = column[read_y] else {
                continue;
            };
            if write_y != read_y {
                column[write_y] = Some(color);
                column[read_y] = None;
                falls.push(BlockFall {
                    from: Position::new(x, read_y as i8),
                    to: Position::new(x, write_y as i8),
                    color,
                });
            }
            write_y += 1;
        }
    }

    /// True when no column has an empty cell below an occupied one
    pub fn is_settled(&self) -> bool {
        (0..self.columns as i8).all(|x| {
            self.column(x)
                .map(|col| {
                    let filled = col.iter().take_while(|c| c.is_some()).count();
                    col[filled..].iter().all(|c| c.is_none())
                })
                .unwrap_or(true)
        })
    }

    /// Write color indices into a row-major `u8` grid (0 = empty, 1.. = color
    /// index + 1), top row first. Rows/columns beyond the grid are zeroed.
    pub fn write_u8_grid(&self, out: &mut [[u8; MAX_DIMENSION as usize]; MAX_DIMENSION as usize]) {
        for row in out.iter_mut() {
            row.fill(0);
        }
        for (pos, color) in self.occupied() {
            let row = (self.rows as i8 - 1 - pos.y) as usize;
            out[row][pos.x as usize] = color.index() + 1;
        }
    }

    /// Parse the text form: one line per row, top row first, one character per
    /// cell (`R G B Y P O`, `.` for empty). Whitespace around lines is ignored.
    pub fn parse(text: &str) -> Result<Self, GridParseError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let rows = lines.len();
        if rows == 0 || rows > MAX_DIMENSION as usize {
            return Err(GridParseError::BadDimensions);
        }
        let columns = lines[0].chars().count();
        if columns == 0 || columns > MAX_DIMENSION as usize {
            return Err(GridParseError::BadDimensions);
        }

        let mut grid = Grid::new(rows as u8, columns as u8);
        for (line_no, line) in lines.iter().enumerate() {
            if line.chars().count() != columns {
                return Err(GridParseError::RaggedRow(line_no));
            }
            let y = (rows - 1 - line_no) as i8;
            for (x, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '.' => None,
                    other => Some(Color::from_char(other).ok_or(GridParseError::BadCell(other))?),
                };
                grid.set(Position::new(x as i8, y), cell);
            }
        }
        Ok(grid)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(MAX_DIMENSION, MAX_DIMENSION)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.rows as i8).rev() {
            for x in 0..self.columns as i8 {
                let ch = self
                    .get(Position::new(x, y))
                    .map(Color::as_char)
                    .unwrap_or('.');
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Errors from [`Grid::parse`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridParseError {
    #[error("grid must have 1..=10 rows and columns")]
    BadDimensions,
    #[error("row {0} has a different width than the first row")]
    RaggedRow(usize),
    #[error("unknown cell character {0:?}")]
    BadCell(char),
}
