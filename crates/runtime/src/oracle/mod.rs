//! Runtime adapters around static game content.
//!
//! The tile table is the only content a session needs. It is acquired once
//! from an ordered list of [`TileSource`]s before the worker starts and is
//! immutable afterwards.
mod source;

pub use source::{FileTileSource, ResolvedTiles, StaticTileSource, TileSource, resolve_tiles};
