//! Core types module - shared data structures and constants
//!
//! This crate defines the value types that flow between the simulation core and
//! its collaborators (rendering, input routing, level policy). Everything here is
//! plain `Copy` data with no behavior beyond parsing and classification helpers.
//!
//! # Board Dimensions
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_DIMENSION` | 2 | Smallest configurable row/column count |
//! | `MAX_DIMENSION` | 10 | Largest row/column count |
//! | `MAX_CELLS` | 100 | Capacity of the flat cell arena |
//! | `MAX_COLORS` | 6 | Number of [`Color`] variants |
//! | `MIN_GROUP_SIZE` | 2 | Smallest blastable group |
//!
//! # Coordinates
//!
//! Positions are `(x, y)` with `x` counting columns left to right and `y`
//! counting rows **upward**. Gravity pulls blocks toward `y = 0`.
//!
//! # Examples
//!
//! ```
//! use tile_blast_types::{Color, IconVariant, Position};
//!
//! let color = Color::from_char('r').unwrap();
//! assert_eq!(color, Color::Red);
//! assert_eq!(Color::from_index(3), Some(Color::Yellow));
//!
//! let pos = Position::new(2, 1);
//! assert_eq!(pos.up(), Position::new(2, 2));
//!
//! assert_eq!(IconVariant::Default.as_str(), "default");
//! ```

use serde::{Deserialize, Serialize};

/// Smallest row/column count a level may configure.
pub const MIN_DIMENSION: u8 = 2;

/// Largest row/column count a board may have.
pub const MAX_DIMENSION: u8 = 10;

/// Capacity of the flat cell arena (10 x 10).
pub const MAX_CELLS: usize = (MAX_DIMENSION as usize) * (MAX_DIMENSION as usize);

/// Number of distinct block colors.
pub const MAX_COLORS: u8 = 6;

/// Smallest group that can be blasted or counts as a legal move.
pub const MIN_GROUP_SIZE: usize = 2;

/// Lower bound for icon thresholds.
pub const MIN_THRESHOLD: u8 = 2;

/// Upper bound for icon thresholds.
pub const MAX_THRESHOLD: u8 = 20;

/// Block colors
///
/// `color_count` in the level configuration selects the first N variants in
/// declaration order, so a 3-color level uses Red, Green and Blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

impl Color {
    /// All colors in sampling order
    pub const ALL: [Color; MAX_COLORS as usize] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
    ];

    /// Map a sampling index to a color
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_blast_types::Color;
    ///
    /// assert_eq!(Color::from_index(0), Some(Color::Red));
    /// assert_eq!(Color::from_index(5), Some(Color::Orange));
    /// assert_eq!(Color::from_index(6), None);
    /// ```
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Sampling index of this color (0-based)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Parse from the single-letter board notation (case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            'B' => Some(Color::Blue),
            'Y' => Some(Color::Yellow),
            'P' => Some(Color::Purple),
            'O' => Some(Color::Orange),
            _ => None,
        }
    }

    /// Single-letter board notation
    pub fn as_char(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Purple => 'P',
            Color::Orange => 'O',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Orange => "orange",
        }
    }
}

/// A cell on the board
///
/// - `None`: Empty cell
/// - `Some(Color)`: Cell occupied by a block of that color
pub type Cell = Option<Color>;

/// Grid coordinate. `y` grows upward.
///
/// Coordinates are signed so that neighbor arithmetic at the edges produces
/// an out-of-bounds position instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    pub fn up(self) -> Self {
        Self::new(self.x, self.y.saturating_add(1))
    }

    pub fn down(self) -> Self {
        Self::new(self.x, self.y.saturating_sub(1))
    }

    pub fn left(self) -> Self {
        Self::new(self.x.saturating_sub(1), self.y)
    }

    pub fn right(self) -> Self {
        Self::new(self.x.saturating_add(1), self.y)
    }

    /// The four orthogonal neighbors in flood-fill visitation order:
    /// up, down, left, right.
    pub fn neighbors(self) -> [Position; 4] {
        [self.up(), self.down(), self.left(), self.right()]
    }

    /// True when `other` shares an edge with `self`
    pub fn is_adjacent(self, other: Position) -> bool {
        let dx = (self.x as i16 - other.x as i16).abs();
        let dy = (self.y as i16 - other.y as i16).abs();
        dx + dy == 1
    }
}

impl From<(i8, i8)> for Position {
    fn from((x, y): (i8, i8)) -> Self {
        Self::new(x, y)
    }
}

/// Icon tier of a block, derived from the size of the group it belongs to
///
/// - **Default**: groups up to threshold A (including singletons)
/// - **A**: size above A
/// - **B**: size above B
/// - **C**: size above C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconVariant {
    #[default]
    Default,
    A,
    B,
    C,
}

impl IconVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            IconVariant::Default => "default",
            IconVariant::A => "a",
            IconVariant::B => "b",
            IconVariant::C => "c",
        }
    }
}

/// Controller state machine phases
///
/// The core runs each transition synchronously; the phase is observable so a
/// presentation layer can gate input while it replays a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoardPhase {
    /// Constructed but never initialized
    #[default]
    Idle,
    Initializing,
    Blasting,
    ApplyingGravity,
    Filling,
    CheckingCascade,
    Shuffling,
    /// Settled and waiting for player input
    Stable,
    /// Level ended; no new blocks will spawn
    Stopped,
}

impl BoardPhase {
    /// True while a transition is in flight
    pub fn is_busy(self) -> bool {
        !matches!(
            self,
            BoardPhase::Idle | BoardPhase::Stable | BoardPhase::Stopped
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BoardPhase::Idle => "idle",
            BoardPhase::Initializing => "initializing",
            BoardPhase::Blasting => "blasting",
            BoardPhase::ApplyingGravity => "applyingGravity",
            BoardPhase::Filling => "filling",
            BoardPhase::CheckingCascade => "checkingCascade",
            BoardPhase::Shuffling => "shuffling",
            BoardPhase::Stable => "stable",
            BoardPhase::Stopped => "stopped",
        }
    }
}

/// Result of a shuffle request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShuffleOutcome {
    /// The random permutation already contained a move.
    Shuffled,
    /// The permutation was deadlocked and a deterministic swap fixed it.
    Repaired,
    /// No color has two blocks; the board stays deadlocked.
    Unsolvable,
}

impl ShuffleOutcome {
    /// True when the board has at least one legal move afterwards
    pub fn is_solvable(self) -> bool {
        !matches!(self, ShuffleOutcome::Unsolvable)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShuffleOutcome::Shuffled => "shuffled",
            ShuffleOutcome::Repaired => "repaired",
            ShuffleOutcome::Unsolvable => "unsolvable",
        }
    }
}

/// Signals published by the board controller
///
/// These are the only coupling point to scoring, UI and win/loss policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoardEvent {
    /// A fresh board was populated.
    LevelStart,
    /// A player blast removed `count` blocks.
    BlocksBlasted { count: usize },
    /// No group of size >= 2 remains.
    Deadlock,
    /// A shuffle finished.
    Shuffled { outcome: ShuffleOutcome },
    /// No further core mutation is pending.
    BoardStable,
}
