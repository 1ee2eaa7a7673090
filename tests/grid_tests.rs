//! Grid tests - bounds handling, gravity and text form

use tile_blast::core::{Grid, GridLayout};
use tile_blast::types::{Color, Position, MAX_DIMENSION};

#[test]
fn test_grid_new_empty() {
    let grid = Grid::new(4, 6);
    assert_eq!(grid.rows(), 4);
    assert_eq!(grid.columns(), 6);
    assert_eq!(grid.len(), 24);

    for y in 0..4 {
        for x in 0..6 {
            let pos = Position::new(x, y);
            assert!(grid.is_valid(pos), "Cell ({}, {}) should be valid", x, y);
            assert_eq!(grid.get(pos), None);
            assert_eq!(grid.cell(pos), Some(None));
        }
    }
}

#[test]
fn test_grid_out_of_bounds_is_harmless() {
    let mut grid = Grid::new(3, 3);

    for pos in [
        Position::new(-1, 0),
        Position::new(0, -1),
        Position::new(3, 0),
        Position::new(0, 3),
        Position::new(i8::MAX, i8::MIN),
    ] {
        assert!(!grid.is_valid(pos));
        assert_eq!(grid.get(pos), None);
        assert_eq!(grid.cell(pos), None);
        assert!(!grid.set(pos, Some(Color::Red)));
        assert!(!grid.is_occupied(pos));
    }
    assert_eq!(grid.occupied_count(), 0);
}

#[test]
fn test_grid_set_and_get() {
    let mut grid = Grid::new(5, 5);

    assert!(grid.set(Position::new(2, 3), Some(Color::Blue)));
    assert_eq!(grid.get(Position::new(2, 3)), Some(Color::Blue));

    assert!(grid.set(Position::new(2, 3), None));
    assert_eq!(grid.get(Position::new(2, 3)), None);
}

#[test]
fn test_color_counts() {
    let grid = Grid::parse(
        "RRG
         B.G
         YYY",
    )
    .unwrap();
    let counts = grid.color_counts();
    assert_eq!(counts[Color::Red.index() as usize], 2);
    assert_eq!(counts[Color::Green.index() as usize], 2);
    assert_eq!(counts[Color::Blue.index() as usize], 1);
    assert_eq!(counts[Color::Yellow.index() as usize], 3);
    assert_eq!(counts[Color::Purple.index() as usize], 0);
    assert_eq!(grid.empty_count(), 1);
}

#[test]
fn test_gravity_compacts_and_preserves_order() {
    let mut grid = Grid::parse(
        "R..
         .G.
         B.Y
         ..P",
    )
    .unwrap();
    grid.apply_gravity();

    let expected = Grid::parse(
        "...
         ...
         R.Y
         BGP",
    )
    .unwrap();
    assert_eq!(grid, expected);
    assert!(grid.is_settled());
}

#[test]
fn test_gravity_on_settled_grid_is_noop() {
    let mut grid = Grid::parse(
        "..G
         R.G
         RBG",
    )
    .unwrap();
    assert!(grid.is_settled());
    let before = grid.clone();
    assert!(grid.apply_gravity().is_empty());
    assert_eq!(grid, before);
}

#[test]
fn test_gravity_full_column_of_gaps() {
    let mut grid = Grid::parse(
        "R
         .
         .
         .",
    )
    .unwrap();
    let falls = grid.apply_gravity();
    assert_eq!(falls.len(), 1);
    assert_eq!(falls[0].from, Position::new(0, 3));
    assert_eq!(falls[0].to, Position::new(0, 0));
    assert_eq!(grid.get(Position::new(0, 0)), Some(Color::Red));
}

#[test]
fn test_positions_sweep_column_major() {
    let grid = Grid::new(2, 2);
    let order: Vec<Position> = grid.positions().collect();
    assert_eq!(
        order,
        vec![
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 0),
            Position::new(1, 1),
        ]
    );
}

#[test]
fn test_max_grid() {
    let grid = Grid::new(MAX_DIMENSION, MAX_DIMENSION);
    assert_eq!(grid.len(), 100);
    assert!(grid.is_valid(Position::new(9, 9)));
    assert!(!grid.is_valid(Position::new(10, 9)));
}

#[test]
fn test_layout_routes_clicks() {
    let layout = GridLayout::new(8, 8, 64.0, 4.0, (0.0, 0.0));
    let target = Position::new(5, 2);
    let (wx, wy) = layout.to_world(target).unwrap();
    assert_eq!(layout.from_world((wx + 10.0, wy - 10.0)), Some(target));
    assert_eq!(layout.from_world((10_000.0, 0.0)), None);
}

#[test]
fn test_gravity_preserves_column_order_on_random_boards() {
    use tile_blast::core::{RandomSource, SimpleRng};

    let mut rng = SimpleRng::new(404);
    for _ in 0..100 {
        let mut grid = Grid::new(1 + rng.next_range(10) as u8, 1 + rng.next_range(10) as u8);
        let positions: Vec<Position> = grid.positions().collect();
        for pos in positions {
            if rng.next_range(2) == 0 {
                grid.set(pos, Color::from_index(rng.next_range(6) as u8));
            }
        }

        let stacks = |g: &Grid| -> Vec<Vec<Color>> {
            (0..g.columns() as i8)
                .map(|x| g.column(x).unwrap().iter().flatten().copied().collect())
                .collect()
        };
        let before = stacks(&grid);
        grid.apply_gravity();
        assert!(grid.is_settled());
        assert_eq!(stacks(&grid), before);

        let settled = grid.clone();
        assert!(grid.apply_gravity().is_empty());
        assert_eq!(grid, settled);
    }
}
