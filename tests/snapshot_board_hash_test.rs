//! Snapshot tests - stable hashing and the plain-value board view

use tile_blast::core::{
    BoardController, BoardSnapshot, EventLog, Grid, LevelConfig, NullSink, SimpleRng,
};
use tile_blast::types::BoardPhase;

#[test]
fn snapshot_board_hash_is_reproducible() {
    let make = || {
        let mut c = BoardController::new(LevelConfig::default(), SimpleRng::new(12345), NullSink);
        c.initialize(8, 8, 4);
        c.snapshot()
    };
    let a = make();
    let b = make();
    assert_eq!(a.board_hash, b.board_hash);
    assert_eq!(a, b);
}

#[test]
fn snapshot_board_hash_differs_by_seed() {
    let hash = |seed| {
        let mut c = BoardController::new(LevelConfig::default(), SimpleRng::new(seed), NullSink);
        c.initialize(8, 8, 4);
        c.snapshot().board_hash
    };
    assert_ne!(hash(1), hash(2));
}

#[test]
fn snapshot_board_layout_is_top_row_first() {
    let c = BoardController::with_grid(
        Grid::parse("R.\nGB").unwrap(),
        LevelConfig::default(),
        SimpleRng::new(1),
        EventLog::new(),
    );
    let s = c.snapshot();
    assert_eq!(s.rows, 2);
    assert_eq!(s.columns, 2);
    // Red=1, Green=2, Blue=3, empty=0.
    assert_eq!(&s.board[0][..2], &[1, 0]);
    assert_eq!(&s.board[1][..2], &[2, 3]);
    assert_eq!(s.board[2], [0; 10]);
    assert_eq!(s.phase, BoardPhase::Stable);
    assert!(s.active);
    assert_eq!(s.available_moves, 0);
    assert!(s.deadlocked);
    assert!(!s.playable());
}

#[test]
fn snapshot_into_reuses_buffer() {
    let mut c = BoardController::new(LevelConfig::default(), SimpleRng::new(8), NullSink);
    c.initialize(3, 3, 2);
    let mut s = BoardSnapshot::default();
    c.snapshot_into(&mut s);
    assert_eq!(s, c.snapshot());
    assert_eq!(s.episode_id, 1);
    assert!(s.playable());
}

#[test]
fn snapshot_serializes_to_json() {
    let mut c = BoardController::new(LevelConfig::default(), SimpleRng::new(8), NullSink);
    c.initialize(4, 4, 3);
    let s = c.snapshot();
    let json = serde_json::to_string(&s).unwrap();
    let back: BoardSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
}
