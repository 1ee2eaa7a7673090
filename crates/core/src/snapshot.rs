use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::types::{BoardPhase, MAX_DIMENSION};

const DIM: usize = MAX_DIMENSION as usize;

/// Plain-value view of a board for observers and regression checks.
///
/// `board` is row-major with the top row first; `0` is empty and `n` is the
/// color with index `n - 1`. Rows and columns beyond the board are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board: [[u8; DIM]; DIM],
    pub rows: u8,
    pub columns: u8,
    pub color_count: u8,
    pub phase: BoardPhase,
    pub active: bool,
    pub deadlocked: bool,
    pub available_moves: u32,
    pub episode_id: u32,
    pub board_hash: u64,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.board = [[0u8; DIM]; DIM];
        self.rows = 0;
        self.columns = 0;
        self.color_count = 0;
        self.phase = BoardPhase::Idle;
        self.active = false;
        self.deadlocked = false;
        self.available_moves = 0;
        self.episode_id = 0;
        self.board_hash = board_hash(&self.board, 0, 0);
    }

    /// Copy the grid cells and refresh `board_hash`
    pub fn write_grid(&mut self, grid: &Grid) {
        grid.write_u8_grid(&mut self.board);
        self.rows = grid.rows();
        self.columns = grid.columns();
        self.board_hash = board_hash(&self.board, self.rows, self.columns);
    }

    pub fn playable(&self) -> bool {
        self.active && !self.deadlocked && !self.phase.is_busy()
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [[0u8; DIM]; DIM],
            rows: 0,
            columns: 0,
            color_count: 0,
            phase: BoardPhase::Idle,
            active: false,
            deadlocked: false,
            available_moves: 0,
            episode_id: 0,
            board_hash: 0,
        };
        s.clear();
        s
    }
}

/// Stable 64-bit FNV-1a over the dimensions and cell bytes.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions, so
/// hashes recorded in regression fixtures would drift.
pub fn board_hash(board: &[[u8; DIM]; DIM], rows: u8, columns: u8) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut h = OFFSET_BASIS;
    let bytes = [rows, columns]
        .into_iter()
        .chain(board.iter().flat_map(|row| row.iter().copied()));
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(PRIME);
    }
    h
}
