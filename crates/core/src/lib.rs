//! Core board logic - pure, deterministic, and testable
//!
//! This crate contains the simulation core of a collapse/blast tile puzzle:
//! a grid of colored blocks where the player removes connected same-color
//! groups, gravity compacts the columns, new blocks refill from the top, and
//! the board is kept solvable. It has **no dependencies** on rendering, input
//! or timing, making it:
//!
//! - **Deterministic**: the same seed produces the same session
//! - **Testable**: every transition is a synchronous function call
//! - **Portable**: runs headless, in a game engine, or in a test harness
//!
//! # Module Structure
//!
//! - [`grid`]: rows x columns cell arena with bounds-checked access and gravity
//! - [`layout`]: grid <-> world coordinate mapping for click routing
//! - [`groups`]: flood-fill group detection and icon classification
//! - [`deadlock`]: "is there any move" queries
//! - [`shuffle`]: random re-arrangement with deterministic solvability repair
//! - [`controller`]: the blast -> gravity -> fill -> cascade state machine
//! - [`config`]: level parameters with permissive sanitizing
//! - [`events`]: sinks for board signals
//! - [`rng`]: injectable random source and a seeded LCG
//! - [`snapshot`]: plain-value board views with a stable hash
//!
//! # Rules
//!
//! - **Groups** are 4-connected (no diagonals); only groups of 2+ can be blasted
//! - **Gravity** pulls toward `y = 0` and preserves the order within a column
//! - **Refill** spawns uniformly random colors into every empty cell, unless
//!   the board was stopped
//! - **Deadlock** (no group of 2+) triggers a shuffle when auto-shuffle is on
//! - **Shuffle** permutes existing colors once and repairs deterministically;
//!   it reports [`ShuffleOutcome::Unsolvable`] when no color has two blocks
//!
//! Out-of-bounds positions are never errors: queries return `None`/`false`
//! and commands do nothing.
//!
//! # Example
//!
//! ```
//! use tile_blast_core::{BoardController, EventLog, LevelConfig, SimpleRng};
//! use tile_blast_core::types::{BoardEvent, Position};
//!
//! let mut board =
//!     BoardController::new(LevelConfig::default(), SimpleRng::new(12345), EventLog::new());
//! board.initialize(6, 6, 3);
//! assert!(!board.is_deadlocked());
//!
//! // Blast the first available group.
//! let group = tile_blast_core::groups::find_valid_groups(board.grid())
//!     .into_iter()
//!     .next()
//!     .unwrap();
//! let removed = board.blast_group(&group.positions);
//! assert_eq!(removed, group.len());
//! assert!(board.sink().events().contains(&BoardEvent::BlocksBlasted { count: removed }));
//!
//! // The refill leaves no holes.
//! assert_eq!(board.grid().empty_count(), 0);
//! assert!(board.get_block(Position::new(0, 0)).is_some());
//! ```

pub mod config;
pub mod controller;
pub mod deadlock;
pub mod events;
pub mod grid;
pub mod groups;
pub mod layout;
pub mod rng;
pub mod shuffle;
pub mod snapshot;

pub use tile_blast_types as types;

// Re-export commonly used types for convenience
pub use config::{ConfigError, LevelConfig, Thresholds};
pub use controller::{BoardController, CascadeReport, Spawn};
pub use events::{EventLog, EventSink, NullSink};
pub use grid::{BlockFall, Grid, GridParseError};
pub use groups::{find_all_groups, find_group, has_any_valid_group, Group, IconMap};
pub use layout::GridLayout;
pub use rng::{RandomSource, SequenceRng, SimpleRng};
pub use snapshot::BoardSnapshot;
pub use types::ShuffleOutcome;
