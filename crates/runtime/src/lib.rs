//! Runtime orchestration for the tile runner.
//!
//! This crate acquires the tile table, boots a [`Session`], and runs it on a
//! simulation worker. Consumers embed [`Runtime`] to drive the runner,
//! subscribe to events, and query the world through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] resolves tile tables from ordered sources
//! - [`session`] owns the level lifecycle
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod oracle;
pub mod runtime;
pub mod session;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle, SourceError};
pub use events::{Event, EventBus, GameplayEvent, LevelEvent, Topic};
pub use oracle::{FileTileSource, ResolvedTiles, StaticTileSource, TileSource, resolve_tiles};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use session::{BootOptions, Session, SessionState};
