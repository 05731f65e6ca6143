//! Plays parsed script steps against a running session.

use std::sync::Arc;

use game_core::{TileTable, World};
use runtime::{RuntimeError, RuntimeHandle};
use tracing::{debug, warn};

use crate::render::{render_map, status_line};
use crate::script::ScriptStep;

/// What one step produced, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepReport {
    Messages(Vec<String>),
    Rejected(String),
    Snapshot { map: String, status: String },
    Hint(Option<String>),
    /// The session cannot accept commands any more.
    Halted(String),
}

pub struct Driver {
    handle: RuntimeHandle,
    tiles: Arc<TileTable>,
}

impl Driver {
    pub fn new(handle: RuntimeHandle, tiles: Arc<TileTable>) -> Self {
        Self { handle, tiles }
    }

    pub async fn step(&self, step: ScriptStep) -> Result<StepReport, RuntimeError> {
        match step {
            ScriptStep::Run(command) => match self.handle.execute(command).await {
                Ok(outcome) => {
                    let messages = outcome
                        .events
                        .iter()
                        .filter_map(|event| event.message())
                        .collect();
                    Ok(StepReport::Messages(messages))
                }
                Err(RuntimeError::Command(error)) => {
                    debug!(?command, %error, "Step rejected");
                    Ok(StepReport::Rejected(error.to_string()))
                }
                Err(RuntimeError::Halted { message }) => Ok(StepReport::Halted(message)),
                Err(error) => Err(error),
            },
            ScriptStep::Show => {
                self.with_world(|world| StepReport::Snapshot {
                    map: render_map(world),
                    status: status_line(world),
                })
                .await
            }
            ScriptStep::Look(at) => {
                let tiles: &TileTable = &self.tiles;
                self.with_world(|world| StepReport::Hint(world.hint_at(tiles, at)))
                    .await
            }
        }
    }

    /// Runs every step in order, stopping at the first halt.
    pub async fn play(&self, steps: &[ScriptStep]) -> Result<Vec<StepReport>, RuntimeError> {
        let mut reports = Vec::with_capacity(steps.len());
        for step in steps {
            let report = self.step(*step).await?;
            let halted = matches!(report, StepReport::Halted(_));
            reports.push(report);
            if halted {
                warn!("Session halted, skipping remaining steps");
                break;
            }
        }
        Ok(reports)
    }

    async fn with_world(
        &self,
        view: impl FnOnce(&World) -> StepReport,
    ) -> Result<StepReport, RuntimeError> {
        match self.handle.query_world().await {
            Ok(world) => Ok(view(&world)),
            Err(RuntimeError::Halted { message }) => Ok(StepReport::Halted(message)),
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Command, Direction, GameConfig, Position};
    use runtime::{BootOptions, Runtime, RuntimeConfig};

    async fn runtime(map: Option<&str>) -> Runtime {
        let config = RuntimeConfig {
            game_config: GameConfig::new().with_dimensions(2, 4),
            seed: Some(5),
            boot: BootOptions {
                map: map.map(str::to_owned),
                stats: None,
            },
            ..RuntimeConfig::default()
        };
        Runtime::builder().config(config).build().await.unwrap()
    }

    #[tokio::test]
    async fn script_reports_rolls_and_rejections() {
        let runtime = runtime(Some("R1A3~X4")).await;
        let driver = Driver::new(runtime.handle(), Arc::clone(runtime.tiles()));

        let reports = driver
            .play(&[
                ScriptStep::Run(Command::Move(Direction::Right)),
                ScriptStep::Run(Command::Roll),
                ScriptStep::Show,
                ScriptStep::Look(Position::new(0, 1)),
            ])
            .await
            .unwrap();

        assert!(matches!(&reports[0], StepReport::Rejected(_)));
        match &reports[1] {
            StepReport::Messages(lines) => assert!(lines[0].starts_with("Rolled")),
            other => panic!("unexpected report: {other:?}"),
        }
        match &reports[2] {
            StepReport::Snapshot { map, .. } => assert_eq!(map, "@...\nXXXX\n"),
            other => panic!("unexpected report: {other:?}"),
        }
        assert_eq!(reports[3], StepReport::Hint(None));

        drop(driver);
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn halted_session_stops_the_script() {
        let runtime = runtime(None).await;
        let driver = Driver::new(runtime.handle(), Arc::clone(runtime.tiles()));

        let reports = driver
            .play(&[ScriptStep::Run(Command::Roll), ScriptStep::Show])
            .await
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert!(matches!(&reports[0], StepReport::Halted(_)));

        drop(driver);
        runtime.shutdown().await.unwrap();
    }
}
