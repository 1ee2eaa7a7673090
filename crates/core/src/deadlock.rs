//! Deadlock module - "does any move exist"
//!
//! A board is deadlocked when no group of [`MIN_GROUP_SIZE`] or more blocks
//! exists. Whether a deadlock can be shuffled away depends only on the color
//! multiset: some color needs at least two blocks.

use crate::grid::Grid;
use crate::groups;
use crate::types::{Color, MIN_GROUP_SIZE};

/// True when the player has no legal move
pub fn is_deadlocked(grid: &Grid) -> bool {
    !groups::has_any_valid_group(grid)
}

/// Number of legal moves (groups of size >= 2)
pub fn available_moves(grid: &Grid) -> usize {
    groups::find_all_groups(grid)
        .iter()
        .filter(|g| g.is_valid_move())
        .count()
}

/// First color (in [`Color::ALL`] order) with at least two blocks on the board.
/// `None` means no arrangement of these blocks can contain a move.
pub fn repairable_color(grid: &Grid) -> Option<Color> {
    let counts = grid.color_counts();
    Color::ALL
        .iter()
        .copied()
        .find(|c| counts[c.index() as usize] >= MIN_GROUP_SIZE)
}
