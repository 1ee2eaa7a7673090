//! Shuffle tests - multiset preservation and the solvability guarantee

use tile_blast::core::groups::has_any_valid_group;
use tile_blast::core::shuffle::{repair, shuffle};
use tile_blast::core::{Grid, RandomSource, SimpleRng};
use tile_blast::types::{Color, Position, ShuffleOutcome};

fn random_grid(rng: &mut SimpleRng, rows: u8, columns: u8, colors: u8, hole_pct: u32) -> Grid {
    let mut grid = Grid::new(rows, columns);
    let positions: Vec<Position> = grid.positions().collect();
    for pos in positions {
        if rng.next_range(100) < hole_pct {
            continue;
        }
        let color = Color::from_index(rng.next_range(colors as u32) as u8).unwrap();
        grid.set(pos, Some(color));
    }
    grid
}

fn occupied_set(grid: &Grid) -> Vec<Position> {
    grid.occupied().map(|(pos, _)| pos).collect()
}

#[test]
fn test_single_row_all_distinct_is_unsolvable() {
    let mut grid = Grid::parse("RGBY").unwrap();
    assert_eq!(grid.rows(), 1);
    assert!(!has_any_valid_group(&grid));

    let before = grid.color_counts();
    let mut rng = SimpleRng::new(17);
    assert_eq!(shuffle(&mut grid, &mut rng), ShuffleOutcome::Unsolvable);

    assert_eq!(grid.color_counts(), before);
    assert_eq!(grid.occupied_count(), 4);
    assert!(!has_any_valid_group(&grid));
}

#[test]
fn test_shuffle_preserves_multiset_and_cells() {
    let mut rng = SimpleRng::new(2024);
    for round in 0..300u32 {
        let rows = 2 + (round % 9) as u8;
        let columns = 2 + ((round / 3) % 9) as u8;
        let colors = 1 + (round % 6) as u8;
        let holes = if round % 4 == 0 { 30 } else { 0 };
        let mut grid = random_grid(&mut rng, rows, columns, colors, holes);

        let counts = grid.color_counts();
        let cells = occupied_set(&grid);
        shuffle(&mut grid, &mut rng);

        assert_eq!(grid.color_counts(), counts, "round {round}");
        assert_eq!(occupied_set(&grid), cells, "round {round}");
    }
}

#[test]
fn test_shuffle_guarantees_a_move_on_full_boards() {
    let mut rng = SimpleRng::new(77);
    for round in 0..300u32 {
        let rows = 2 + (round % 9) as u8;
        let columns = 2 + ((round / 7) % 9) as u8;
        let mut grid = random_grid(&mut rng, rows, columns, 6, 0);
        let solvable = grid.color_counts().iter().any(|&n| n >= 2);

        let outcome = shuffle(&mut grid, &mut rng);
        assert_eq!(outcome.is_solvable(), solvable, "round {round}");
        if solvable {
            assert!(has_any_valid_group(&grid), "round {round}");
        }
    }
}

#[test]
fn test_shuffle_guarantees_a_move_with_holes() {
    let mut rng = SimpleRng::new(5150);
    for round in 0..300u32 {
        let mut grid = random_grid(&mut rng, 6, 6, 6, 70);
        let solvable = grid.color_counts().iter().any(|&n| n >= 2);

        let outcome = shuffle(&mut grid, &mut rng);
        assert_eq!(outcome.is_solvable(), solvable, "round {round}");
        if solvable {
            assert!(has_any_valid_group(&grid), "round {round}");
        }
    }
}

#[test]
fn test_checkerboard_is_repaired() {
    // Two colors alternating: every permutation keeps the counts, and the
    // repair forces a pair at the first horizontal slot.
    let mut grid = Grid::parse(
        "RG
         GR",
    )
    .unwrap();
    assert!(!has_any_valid_group(&grid));
    assert!(repair(&mut grid));
    assert!(has_any_valid_group(&grid));
    assert_eq!(grid.get(Position::new(0, 0)), grid.get(Position::new(1, 0)));
    assert_eq!(grid.color_counts()[Color::Red.index() as usize], 2);
    assert_eq!(grid.color_counts()[Color::Green.index() as usize], 2);
}

#[test]
fn test_isolated_blocks_are_moved_together() {
    let mut grid = Grid::parse(
        "R.G
         ...
         G.R",
    )
    .unwrap();
    assert!(!has_any_valid_group(&grid));
    assert!(repair(&mut grid));
    assert!(has_any_valid_group(&grid));
    assert_eq!(grid.occupied_count(), 4);
}

#[test]
fn test_repair_on_playable_board_changes_nothing() {
    let mut grid = Grid::parse("RRG\nBYP").unwrap();
    let before = grid.clone();
    assert!(repair(&mut grid));
    assert_eq!(grid, before);
}

#[test]
fn test_same_seed_same_shuffle() {
    let base = Grid::parse(
        "RGBY
         GBYR
         BYRG
         YRGB",
    )
    .unwrap();
    let mut a = base.clone();
    let mut b = base;
    shuffle(&mut a, &mut SimpleRng::new(31));
    shuffle(&mut b, &mut SimpleRng::new(31));
    assert_eq!(a, b);
}
