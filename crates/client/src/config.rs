//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use game_core::GameConfig;
use runtime::{BootOptions, RuntimeConfig};

/// Settings the headless client needs before it can build a runtime.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Directory holding `config.toml` and `tiles.json`.
    pub data_dir: PathBuf,
    /// Extra tile tables tried before the data directory's own table.
    pub tile_sources: Vec<PathBuf>,
    pub map: Option<String>,
    pub stats: Option<String>,
    pub seed: Option<u64>,
    /// Overrides `fog_enabled` from `config.toml` when set.
    pub fog: Option<bool>,
    pub source_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            tile_sources: Vec::new(),
            map: None,
            stats: None,
            seed: None,
            fog: None,
            source_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `RUNNER_DATA_DIR` - Data directory (default: `data`)
    /// - `RUNNER_TILE_SOURCES` - Comma-separated tile table paths tried first
    /// - `RUNNER_MAP` - Encoded map to boot instead of the default exit map
    /// - `RUNNER_STATS` - Carried-stats string for the first level
    /// - `RUNNER_SEED` - Session seed (default: random)
    /// - `RUNNER_FOG` - Force fog on or off
    /// - `RUNNER_SOURCE_TIMEOUT_MS` - Per-source timeout in milliseconds (default: 5000)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("RUNNER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(list) = env::var("RUNNER_TILE_SOURCES") {
            config.tile_sources = parse_path_list(&list);
        }

        config.map = non_empty_var("RUNNER_MAP");
        config.stats = non_empty_var("RUNNER_STATS");
        config.seed = read_env::<u64>("RUNNER_SEED");
        config.fog = read_env::<bool>("RUNNER_FOG");

        if let Some(ms) = read_env::<u64>("RUNNER_SOURCE_TIMEOUT_MS") {
            config.source_timeout = Duration::from_millis(ms.max(1));
        }

        config
    }

    /// Tile tables in the order the runtime should try them.
    pub fn tile_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.tile_sources.clone();
        paths.push(self.data_dir.join(game_content::ContentFactory::TILES_FILE));
        paths
    }

    pub fn runtime_config(&self, mut game_config: GameConfig) -> RuntimeConfig {
        if let Some(fog) = self.fog {
            game_config = game_config.with_fog(fog);
        }
        RuntimeConfig {
            game_config,
            seed: self.seed,
            tile_paths: self.tile_paths(),
            source_timeout: self.source_timeout,
            boot: BootOptions {
                map: self.map.clone(),
                stats: self.stats.clone(),
            },
            ..RuntimeConfig::default()
        }
    }
}

fn parse_path_list(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_list_skips_blanks() {
        let paths = parse_path_list(" a.json, ,b.ron,");
        assert_eq!(paths, vec![PathBuf::from("a.json"), PathBuf::from("b.ron")]);
    }

    #[test]
    fn data_dir_table_is_tried_last() {
        let config = ClientConfig {
            data_dir: PathBuf::from("/srv/runner"),
            tile_sources: vec![PathBuf::from("override.json")],
            ..ClientConfig::default()
        };
        assert_eq!(
            config.tile_paths(),
            vec![
                PathBuf::from("override.json"),
                PathBuf::from("/srv/runner/tiles.json")
            ]
        );
    }

    #[test]
    fn fog_override_and_boot_options_reach_runtime() {
        let config = ClientConfig {
            fog: Some(true),
            seed: Some(9),
            map: Some("R1A24".into()),
            ..ClientConfig::default()
        };
        let runtime = config.runtime_config(GameConfig::new());
        assert!(runtime.game_config.fog_enabled);
        assert_eq!(runtime.seed, Some(9));
        assert_eq!(runtime.boot.map.as_deref(), Some("R1A24"));
        assert_eq!(runtime.boot.stats, None);
    }
}
