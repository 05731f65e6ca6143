//! Level lifecycle around a single [`World`].
//!
//! A session boots from the tile table's default exit destination (or an
//! explicit map), executes commands against the current world, and swaps the
//! world out when the runner takes a wired exit.

use std::sync::Arc;

use game_core::codec;
use game_core::env::compute_seed;
use game_core::{
    Command, Env, ErrorContext, GameConfig, GameEngine, GameError, LevelTransition, Outcome,
    PcgRng, TileTable, World,
};
use tracing::{debug, info, warn};

use crate::api::{Result, RuntimeError};

/// Seed context separating per-level seeds from dice seeds.
const LEVEL_SEED_CONTEXT: u32 = 0x4c45_564c;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Playing(World),
    /// No level could be loaded. Commands are refused.
    Halted { message: String },
}

/// Where the first level comes from.
#[derive(Debug, Clone, Default)]
pub struct BootOptions {
    /// Encoded map that overrides the tile table's default destination.
    pub map: Option<String>,
    /// Carried-stats string applied to the first level.
    pub stats: Option<String>,
}

pub struct Session {
    tiles: Arc<TileTable>,
    rng: PcgRng,
    config: GameConfig,
    seed: u64,
    levels_loaded: u64,
    state: SessionState,
}

impl Session {
    pub const BOOT_ERROR: &'static str =
        "BOOT ERROR: the tile table has no default exit map, so no level can load.";

    pub fn boot(tiles: Arc<TileTable>, config: GameConfig, seed: u64, options: BootOptions) -> Self {
        let mut session = Self {
            tiles,
            rng: PcgRng,
            config,
            seed,
            levels_loaded: 0,
            state: SessionState::Halted {
                message: Self::BOOT_ERROR.to_owned(),
            },
        };

        let map = options
            .map
            .filter(|map| !map.trim().is_empty())
            .or_else(|| session.tiles.boot_map().map(str::to_owned));
        match map {
            Some(map) => {
                let stats = options.stats.unwrap_or_default();
                session.load_level(game_core::env::VariantText::DEFAULT_KEY, &map, &stats);
            }
            None => warn!(target: "runtime::session", "{}", Self::BOOT_ERROR),
        }
        session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn world(&self) -> Option<&World> {
        match &self.state {
            SessionState::Playing(world) => Some(world),
            SessionState::Halted { .. } => None,
        }
    }

    pub fn tiles(&self) -> &Arc<TileTable> {
        &self.tiles
    }

    pub fn levels_loaded(&self) -> u64 {
        self.levels_loaded
    }

    /// Runs one command. A rejected command leaves the world unchanged.
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        let world = match &mut self.state {
            SessionState::Playing(world) => world,
            SessionState::Halted { message } => {
                return Err(RuntimeError::Halted {
                    message: message.clone(),
                });
            }
        };

        let mut working = world.clone();
        let env = Env::new(self.tiles.as_ref(), &self.rng);
        let outcome = match GameEngine::new(&mut working).execute(env, command) {
            Ok(outcome) => outcome,
            Err(error) => {
                let context = ErrorContext::new(world.roll_count).with_position(world.runner.position);
                debug!(
                    target: "runtime::session",
                    code = error.error_code(),
                    severity = ?error.severity(),
                    context = ?context,
                    "Command rejected: {}",
                    error
                );
                return Err(error.into());
            }
        };
        *world = working;

        if let Some(transition) = &outcome.transition {
            self.enter(transition);
        }
        Ok(outcome)
    }

    fn enter(&mut self, transition: &LevelTransition) {
        info!(
            target: "runtime::session",
            key = %transition.key,
            stats = %transition.stats,
            "Level transition"
        );
        self.load_level(&transition.key, &transition.map, &transition.stats);
    }

    fn load_level(&mut self, key: &str, map: &str, stats: &str) {
        let carried = codec::decode_stats(stats);
        let level_seed = compute_seed(self.seed, self.levels_loaded, LEVEL_SEED_CONTEXT);
        let world = World::load(map, self.config.clone(), self.tiles.as_ref(), carried, level_seed)
            .with_level_key(key);
        self.levels_loaded += 1;
        info!(
            target: "runtime::session",
            key,
            level = self.levels_loaded,
            spawn = ?world.runner.position,
            "Level loaded"
        );
        self.state = SessionState::Playing(world);
    }
}
