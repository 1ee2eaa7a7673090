//! Groups module - connected-component analysis
//!
//! A group is a maximal set of same-colored occupied cells connected through
//! up/down/left/right adjacency. Flood fills are iterative with a fixed-capacity
//! stack, and neighbors are always visited in the order up, down, left, right,
//! so repeated calls on an unchanged grid give identical results.
//!
//! Nothing here is cached: every query walks the grid as it is now.

use arrayvec::ArrayVec;

use crate::config::Thresholds;
use crate::grid::Grid;
use crate::types::{Color, IconVariant, Position, MAX_CELLS, MIN_GROUP_SIZE};

/// A maximal connected same-color component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub color: Color,
    /// Members in discovery order
    pub positions: Vec<Position>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    /// True when the group is large enough to blast
    pub fn is_valid_move(&self) -> bool {
        self.len() >= MIN_GROUP_SIZE
    }
}

/// Visited flags for one sweep, indexed like the grid arena
struct Visited {
    rows: usize,
    flags: [bool; MAX_CELLS],
}

impl Visited {
    fn new(grid: &Grid) -> Self {
        Self {
            rows: grid.rows() as usize,
            flags: [false; MAX_CELLS],
        }
    }

    #[inline]
    fn slot(&self, pos: Position) -> usize {
        pos.x as usize * self.rows + pos.y as usize
    }

    fn is_set(&self, pos: Position) -> bool {
        self.flags[self.slot(pos)]
    }

    /// Mark `pos`, returning false if it was already marked
    fn mark(&mut self, pos: Position) -> bool {
        let slot = self.slot(pos);
        !std::mem::replace(&mut self.flags[slot], true)
    }
}

/// Flood fill from `start`, marking into `visited`. Caller guarantees `start`
/// is occupied and unvisited.
fn flood(grid: &Grid, start: Position, color: Color, visited: &mut Visited) -> Vec<Position> {
    let mut members = Vec::new();
    let mut stack: ArrayVec<Position, MAX_CELLS> = ArrayVec::new();

    visited.mark(start);
    stack.push(start);

    while let Some(pos) = stack.pop() {
        members.push(pos);
        for next in pos.neighbors() {
            if grid.get(next) == Some(color) && visited.mark(next) {
                // Each cell is marked before it is pushed, so the stack never
                // holds more than MAX_CELLS entries.
                stack.push(next);
            }
        }
    }

    members
}

/// The group containing `start`. Empty or out-of-bounds starts yield `None`.
///
/// Singletons are real groups of size 1.
pub fn find_group(grid: &Grid, start: Position) -> Option<Group> {
    let color = grid.get(start)?;
    let mut visited = Visited::new(grid);
    let positions = flood(grid, start, color, &mut visited);
    Some(Group { color, positions })
}

/// Partition every occupied cell into groups (sweep is column-major, bottom
/// to top). Singletons are included.
pub fn find_all_groups(grid: &Grid) -> Vec<Group> {
    let mut visited = Visited::new(grid);
    let mut groups = Vec::new();

    for (pos, color) in grid.occupied() {
        if visited.is_set(pos) {
            continue;
        }
        let positions = flood(grid, pos, color, &mut visited);
        groups.push(Group { color, positions });
    }

    groups
}

/// Groups of at least [`MIN_GROUP_SIZE`] blocks (the legal moves)
pub fn find_valid_groups(grid: &Grid) -> Vec<Group> {
    let mut groups = find_all_groups(grid);
    groups.retain(Group::is_valid_move);
    groups
}

/// True as soon as any group of size >= 2 exists.
///
/// A group has two or more members exactly when one of its cells has a
/// same-colored neighbor, so it suffices to look right and up from each cell
/// and stop at the first hit.
pub fn has_any_valid_group(grid: &Grid) -> bool {
    grid.occupied().any(|(pos, color)| {
        grid.get(pos.right()) == Some(color) || grid.get(pos.up()) == Some(color)
    })
}

/// Icon variant of every cell, computed from a fresh partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconMap {
    rows: u8,
    columns: u8,
    variants: [IconVariant; MAX_CELLS],
}

impl IconMap {
    /// All-default map for a grid of the given shape
    pub fn empty(rows: u8, columns: u8) -> Self {
        Self {
            rows,
            columns,
            variants: [IconVariant::Default; MAX_CELLS],
        }
    }

    /// Variant at `pos`. Empty cells report `Default`; out of bounds is `None`.
    pub fn get(&self, pos: Position) -> Option<IconVariant> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.columns as i8 || pos.y >= self.rows as i8 {
            return None;
        }
        Some(self.variants[pos.x as usize * self.rows as usize + pos.y as usize])
    }

    fn set(&mut self, pos: Position, variant: IconVariant) {
        self.variants[pos.x as usize * self.rows as usize + pos.y as usize] = variant;
    }
}

/// Classify every block by the size of its group
pub fn classify_icons(grid: &Grid, thresholds: &Thresholds) -> IconMap {
    let mut map = IconMap::empty(grid.rows(), grid.columns());
    for group in find_all_groups(grid) {
        let variant = thresholds.classify(group.len());
        for &pos in &group.positions {
            map.set(pos, variant);
        }
    }
    map
}
