//! High-level runtime orchestrator.
//!
//! The runtime resolves the tile table, boots the session, owns the
//! simulation worker, and exposes a builder-based API for clients.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use game_core::GameConfig;
use tracing::info;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::oracle::{FileTileSource, ResolvedTiles, TileSource, resolve_tiles};
use crate::session::{BootOptions, Session};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Session seed. A random one is drawn when unset.
    pub seed: Option<u64>,
    /// Tile table files tried in order.
    pub tile_paths: Vec<PathBuf>,
    /// Time allowed for each tile source.
    pub source_timeout: Duration,
    /// Emit a frame tick on this period when set.
    pub frame_interval: Option<Duration>,
    pub boot: BootOptions,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            seed: None,
            tile_paths: Vec::new(),
            source_timeout: Duration::from_secs(5),
            frame_interval: None,
            boot: BootOptions::default(),
        }
    }
}

/// Main runtime that orchestrates the game session
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    tiles: ResolvedTiles,
    seed: u64,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Origin of the tile table in use, `None` for the minimal fallback.
    pub fn tile_origin(&self) -> Option<&str> {
        self.tiles.origin.as_deref()
    }

    pub fn tiles(&self) -> &Arc<game_core::TileTable> {
        &self.tiles.table
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    sources: Vec<Arc<dyn TileSource>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            sources: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a tile source, tried after the configured tile paths.
    pub fn tile_source(mut self, source: impl TileSource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Build the runtime
    ///
    /// Tile acquisition never fails: the minimal table is used as a last
    /// resort and the session halts if it cannot boot a level.
    pub async fn build(self) -> Result<Runtime> {
        let mut sources: Vec<Arc<dyn TileSource>> = self
            .config
            .tile_paths
            .iter()
            .map(|path| Arc::new(FileTileSource::new(path.clone())) as Arc<dyn TileSource>)
            .collect();
        sources.extend(self.sources);

        let tiles = resolve_tiles(&sources, self.config.source_timeout).await;
        let seed = self.config.seed.unwrap_or_else(rand::random);
        info!(target: "runtime", seed, origin = ?tiles.origin, "Booting session");

        let session = Session::boot(
            Arc::clone(&tiles.table),
            self.config.game_config.clone(),
            seed,
            self.config.boot.clone(),
        );

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker =
            SimulationWorker::new(session, command_rx, event_bus, self.config.frame_interval);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            tiles,
            seed,
            sim_worker_handle,
        })
    }
}
