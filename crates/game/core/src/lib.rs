//! Deterministic rules of the dice-driven tile runner.
//!
//! `game-core` owns the level model (tile grid, runner, dice pool, fog), the
//! tile behavior table, the map and stats codecs, and the engine that
//! resolves movement, physics, combat and locks. Nothing here performs I/O;
//! tile tables are supplied through [`env::TileOracle`] and dice through
//! [`env::RngOracle`]. All state mutation flows through
//! [`engine::GameEngine`].
pub mod codec;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod rules;
pub mod state;

pub use config::GameConfig;
pub use engine::{
    Command, CommandError, DamageSource, GameEngine, GameEvent, LevelTransition, Outcome,
    PhysicsState,
};
pub use env::{
    Env, PcgRng, PickupKind, RngOracle, TableError, TileBehavior, TileDefinition, TileKind,
    TileOracle, TileTable,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use rules::{DiceCheck, DiceRule, LockRule, MonsterSpec, RawDiceRule};
pub use state::{
    CarriedStats, DiceFaces, DicePool, DieSlot, Direction, FogGrid, MapDimensions, Position,
    Runner, TileGrid, TileSymbol, Variant, World, WorldStatus,
};
