//! Data-driven content definitions and loaders.
//!
//! This crate reads the files a game session is built from:
//! - Tile-definition tables (JSON as published for the web build, or RON)
//! - Game configuration (TOML)
//!
//! Content is consumed by the runtime and never appears in game state.
//! All loaders use game-core types directly with serde for deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, TileTableLoader, TileTableReport};
