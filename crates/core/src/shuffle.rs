//! Shuffle module - solvable re-arrangement of the existing blocks
//!
//! A shuffle permutes the colors already on the board across the same set of
//! occupied positions (Fisher-Yates through the injected [`RandomSource`]),
//! then checks for a move. If the permutation is deadlocked, a deterministic
//! repair swaps two same-colored blocks into adjacent cells. The random step
//! runs exactly once; there is no retry loop.

use tracing::{debug, info};

use crate::deadlock::{is_deadlocked, repairable_color};
use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::types::{Color, Position, ShuffleOutcome};

/// Randomly permute the board's colors and guarantee a move when the color
/// multiset allows one.
pub fn shuffle<R: RandomSource>(grid: &mut Grid, rng: &mut R) -> ShuffleOutcome {
    let (positions, mut colors): (Vec<Position>, Vec<Color>) = grid.occupied().unzip();
    rng.shuffle(&mut colors);
    for (&pos, &color) in positions.iter().zip(&colors) {
        grid.set(pos, Some(color));
    }

    if !is_deadlocked(grid) {
        debug!(blocks = positions.len(), "shuffle produced a playable board");
        return ShuffleOutcome::Shuffled;
    }

    if repair(grid) {
        ShuffleOutcome::Repaired
    } else {
        ShuffleOutcome::Unsolvable
    }
}

/// Deterministically create a group of two. Returns false (leaving the board
/// untouched) when no color has two blocks.
///
/// The target pair is the first horizontally adjacent pair of occupied cells
/// in row-major order, else the first vertical pair in column-major order.
/// Both targets receive blocks of the chosen color by swapping, so the set of
/// occupied cells and the color multiset are unchanged. If no two occupied
/// cells touch at all, a block of the chosen color is moved into an empty cell
/// next to another one.
pub fn repair(grid: &mut Grid) -> bool {
    if !is_deadlocked(grid) {
        return true;
    }

    let Some(color) = repairable_color(grid) else {
        info!("shuffle repair impossible: no color has two blocks");
        return false;
    };

    if let Some((p, q)) = find_occupied_pair(grid) {
        gather_pair(grid, color, p, q);
        debug!(?color, ?p, ?q, "repaired deadlock by swapping into adjacent pair");
    } else if let Some((anchor, empty)) = find_open_neighbor(grid, color) {
        let Some(source) = find_color(grid, color, |pos| pos != anchor) else {
            return false;
        };
        grid.set(empty, Some(color));
        grid.set(source, None);
        debug!(?color, ?anchor, ?empty, "repaired deadlock by moving into empty cell");
    } else {
        return false;
    }

    debug_assert!(!is_deadlocked(grid));
    true
}

/// First adjacent pair of occupied cells: horizontal scan row-major, then
/// vertical scan column-major.
fn find_occupied_pair(grid: &Grid) -> Option<(Position, Position)> {
    let rows = grid.rows() as i8;
    let columns = grid.columns() as i8;

    for y in 0..rows {
        for x in 0..columns - 1 {
            let p = Position::new(x, y);
            if grid.is_occupied(p) && grid.is_occupied(p.right()) {
                return Some((p, p.right()));
            }
        }
    }

    for x in 0..columns {
        for y in 0..rows - 1 {
            let p = Position::new(x, y);
            if grid.is_occupied(p) && grid.is_occupied(p.up()) {
                return Some((p, p.up()));
            }
        }
    }

    None
}

/// First block of `color` (sweep order) with an empty neighbor
fn find_open_neighbor(grid: &Grid, color: Color) -> Option<(Position, Position)> {
    grid.occupied()
        .filter(|&(_, c)| c == color)
        .find_map(|(pos, _)| {
            pos.neighbors()
                .into_iter()
                .find(|&n| grid.cell(n) == Some(None))
                .map(|n| (pos, n))
        })
}

fn find_color(grid: &Grid, color: Color, accept: impl Fn(Position) -> bool) -> Option<Position> {
    grid.occupied()
        .find(|&(pos, c)| c == color && accept(pos))
        .map(|(pos, _)| pos)
}

/// Swap blocks of `color` into both `p` and `q` (both occupied).
fn gather_pair(grid: &mut Grid, color: Color, p: Position, q: Position) {
    if grid.get(p) != Some(color) {
        if let Some(src) = find_color(grid, color, |pos| pos != q) {
            grid.swap(src, p);
        }
    }
    if grid.get(q) != Some(color) {
        if let Some(src) = find_color(grid, color, |pos| pos != p) {
            grid.swap(src, q);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    #[test]
    fn test_repair_checkerboard() {
        let mut grid = Grid::parse(
            "RGR
             GRG",
        )
        .unwrap();
        let before = grid.color_counts();
        assert!(repair(&mut grid));
        assert!(!is_deadlocked(&grid));
        assert_eq!(grid.color_counts(), before);
        assert_eq!(grid.get(Position::new(0, 0)), Some(Color::Red));
        assert_eq!(grid.get(Position::new(1, 0)), Some(Color::Red));
    }

    #[test]
    fn test_repair_uses_vertical_pair_on_single_column() {
        let mut grid = Grid::parse(
            "R
             G
             R",
        )
        .unwrap();
        assert!(repair(&mut grid));
        assert_eq!(grid.get(Position::new(0, 0)), Some(Color::Red));
        assert_eq!(grid.get(Position::new(0, 1)), Some(Color::Red));
        assert_eq!(grid.get(Position::new(0, 2)), Some(Color::Green));
    }

    #[test]
    fn test_repair_isolated_blocks_moves_into_gap() {
        let mut grid = Grid::parse("R.R").unwrap();
        assert!(repair(&mut grid));
        assert!(!is_deadlocked(&grid));
        assert_eq!(grid.occupied_count(), 2);
    }

    #[test]
    fn test_repair_impossible() {
        let mut grid = Grid::parse("RGBY").unwrap();
        let before = grid.clone();
        assert!(!repair(&mut grid));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_repair_noop_when_playable() {
        let mut grid = Grid::parse("RRG").unwrap();
        let before = grid.clone();
        assert!(repair(&mut grid));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_shuffle_keeps_occupied_positions() {
        let mut grid = Grid::parse(
            "R..
             GB.
             BRG",
        )
        .unwrap();
        let occupied_before: Vec<Position> = grid.occupied().map(|(p, _)| p).collect();
        let counts_before = grid.color_counts();
        let mut rng = SimpleRng::new(3);
        let outcome = shuffle(&mut grid, &mut rng);
        assert!(outcome.is_solvable());
        let occupied_after: Vec<Position> = grid.occupied().map(|(p, _)| p).collect();
        assert_eq!(occupied_before, occupied_after);
        assert_eq!(grid.color_counts(), counts_before);
    }
}
