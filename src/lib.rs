//! Tile Blast (workspace facade crate).
//!
//! Re-exports the simulation core and its shared types as
//! `tile_blast::{core, types}` so integration tests, benchmarks and the
//! headless simulator depend on one package.

pub use tile_blast_core as core;
pub use tile_blast_types as types;
