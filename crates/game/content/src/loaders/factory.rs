//! Content factory for loading game data from a directory.

use std::path::{Path, PathBuf};

use crate::loaders::{ConfigLoader, LoadResult, TileTableLoader, TileTableReport};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── tiles.json
/// └── tiles.ron      (optional alternative table)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const TILES_FILE: &'static str = "tiles.json";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<game_core::GameConfig> {
        ConfigLoader::load(&self.data_dir.join(Self::CONFIG_FILE))
    }

    /// Load the default tile table from `tiles.json`.
    pub fn load_tiles(&self) -> LoadResult<TileTableReport> {
        self.load_tiles_from(Self::TILES_FILE)
    }

    /// Load a tile table from a file relative to the data directory.
    pub fn load_tiles_from(&self, file_name: &str) -> LoadResult<TileTableReport> {
        TileTableLoader::load(&self.data_dir.join(file_name))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
