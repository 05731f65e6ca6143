//! Tile-table sources and their ordered resolution.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use game_content::{TileTableLoader, TileTableReport};
use game_core::TileTable;
use tracing::{info, warn};

use crate::api::SourceError;

/// One candidate location of the tile-definition table.
#[async_trait]
pub trait TileSource: Send + Sync {
    /// Human-readable origin used in logs.
    fn origin(&self) -> String;

    async fn fetch(&self) -> Result<TileTableReport, SourceError>;
}

/// Table stored on disk as JSON or RON.
#[derive(Debug, Clone)]
pub struct FileTileSource {
    path: PathBuf,
}

impl FileTileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TileSource for FileTileSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<TileTableReport, SourceError> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| SourceError::Io {
                    path: self.path.clone(),
                    source,
                })?;
        let parsed = match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => TileTableLoader::from_ron_str(&content),
            _ => TileTableLoader::from_json_str(&content),
        };
        parsed.map_err(|e| SourceError::Parse {
            origin: self.origin(),
            message: format!("{e:#}"),
        })
    }
}

/// Table held in memory as JSON text.
#[derive(Debug, Clone)]
pub struct StaticTileSource {
    name: String,
    json: String,
}

impl StaticTileSource {
    pub fn new(name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            json: json.into(),
        }
    }
}

#[async_trait]
impl TileSource for StaticTileSource {
    fn origin(&self) -> String {
        format!("static:{}", self.name)
    }

    async fn fetch(&self) -> Result<TileTableReport, SourceError> {
        TileTableLoader::from_json_str(&self.json).map_err(|e| SourceError::Parse {
            origin: self.origin(),
            message: format!("{e:#}"),
        })
    }
}

/// Outcome of tile acquisition.
#[derive(Debug, Clone)]
pub struct ResolvedTiles {
    pub table: Arc<TileTable>,
    /// Origin of the source that won, `None` when the minimal table is used.
    pub origin: Option<String>,
}

/// Tries each source in order and keeps the first table that loads.
///
/// Every source gets `timeout`. When all of them fail the minimal table
/// (`X` wall, `.` air) is returned, which has no boot map.
pub async fn resolve_tiles(sources: &[Arc<dyn TileSource>], timeout: Duration) -> ResolvedTiles {
    for source in sources {
        let origin = source.origin();
        let attempt = match tokio::time::timeout(timeout, source.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                origin: origin.clone(),
                timeout,
            }),
        };

        match attempt {
            Ok(report) => {
                for warning in &report.warnings {
                    warn!(target: "runtime::tiles", origin = %origin, "{}", warning);
                }
                info!(
                    target: "runtime::tiles",
                    origin = %origin,
                    tiles = report.table.len(),
                    "Tile table loaded"
                );
                return ResolvedTiles {
                    table: Arc::new(report.table),
                    origin: Some(origin),
                };
            }
            Err(error) => {
                warn!(target: "runtime::tiles", error = %error, "Tile source failed, trying next");
            }
        }
    }

    warn!(target: "runtime::tiles", "All tile sources failed, using minimal table");
    ResolvedTiles {
        table: Arc::new(TileTable::minimal()),
        origin: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{TileOracle, TileSymbol};

    struct SlowSource;

    #[async_trait]
    impl TileSource for SlowSource {
        fn origin(&self) -> String {
            "slow".into()
        }

        async fn fetch(&self) -> Result<TileTableReport, SourceError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(SourceError::Parse {
                origin: self.origin(),
                message: "unreachable".into(),
            })
        }
    }

    #[tokio::test]
    async fn first_working_source_wins() {
        let sources: Vec<Arc<dyn TileSource>> = vec![
            Arc::new(FileTileSource::new("/nonexistent/tiles.json")),
            Arc::new(StaticTileSource::new("broken", "{ not json")),
            Arc::new(StaticTileSource::new("good", r#"{ "P": { "solid": true } }"#)),
            Arc::new(StaticTileSource::new("later", r#"{ "Q": { "solid": true } }"#)),
        ];
        let resolved = resolve_tiles(&sources, Duration::from_secs(1)).await;
        assert_eq!(resolved.origin.as_deref(), Some("static:good"));
        assert!(resolved.table.behavior(TileSymbol('P')).solid);
        assert!(!resolved.table.contains(TileSymbol('Q')));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_source_times_out() {
        let sources: Vec<Arc<dyn TileSource>> = vec![
            Arc::new(SlowSource),
            Arc::new(StaticTileSource::new("good", r#"{ "P": { "solid": true } }"#)),
        ];
        let resolved = resolve_tiles(&sources, Duration::from_millis(50)).await;
        assert_eq!(resolved.origin.as_deref(), Some("static:good"));
    }

    #[tokio::test]
    async fn total_failure_falls_back_to_minimal() {
        let sources: Vec<Arc<dyn TileSource>> =
            vec![Arc::new(StaticTileSource::new("broken", "[]"))];
        let resolved = resolve_tiles(&sources, Duration::from_secs(1)).await;
        assert!(resolved.origin.is_none());
        assert!(resolved.table.behavior(TileSymbol::BOUNDARY).solid);
        assert!(resolved.table.boot_map().is_none());
    }
}
