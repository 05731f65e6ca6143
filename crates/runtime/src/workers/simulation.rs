//! Simulation worker that owns the authoritative [`Session`].
//!
//! Receives commands from [`crate::RuntimeHandle`], executes them one at a
//! time, and publishes the results to the [`EventBus`].

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};

use game_core::{Command as GameCommand, GameError, GameEvent, Outcome, World};
use tracing::{debug, info};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, GameplayEvent, LevelEvent};
use crate::session::{Session, SessionState};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Execute one game command against the current level.
    Execute {
        command: GameCommand,
        reply: oneshot::Sender<Result<Outcome>>,
    },
    /// Query the current world (read-only snapshot).
    QueryWorld {
        reply: oneshot::Sender<Result<World>>,
    },
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    session: Session,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    frame_interval: Option<Duration>,
}

impl SimulationWorker {
    pub fn new(
        session: Session,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        frame_interval: Option<Duration>,
    ) -> Self {
        Self {
            session,
            command_rx,
            event_bus,
            frame_interval,
        }
    }

    /// Main worker loop. Ends when every handle has been dropped.
    pub async fn run(mut self) {
        self.announce_state();

        let mut frames = self.frame_interval.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = next_frame(&mut frames) => {
                    if self.session.world().is_some_and(|world| !world.is_over()) {
                        let _ = self.execute(GameCommand::Tick);
                    }
                }
            }
        }
        info!(target: "runtime::worker", "Simulation worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Execute { command, reply } => {
                let result = self.execute(command);
                if reply.send(result).is_err() {
                    debug!("Execute reply channel closed (caller dropped)");
                }
            }
            Command::QueryWorld { reply } => {
                let result = match self.session.state() {
                    SessionState::Playing(world) => Ok(world.clone()),
                    SessionState::Halted { message } => Err(RuntimeError::Halted {
                        message: message.clone(),
                    }),
                };
                if reply.send(result).is_err() {
                    debug!("QueryWorld reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn execute(&mut self, command: GameCommand) -> Result<Outcome> {
        let levels_before = self.session.levels_loaded();
        let result = self.session.execute(command);

        match &result {
            Ok(outcome) => {
                for event in &outcome.events {
                    debug!(target: "runtime::worker", ?command, event = ?event, "Game event");
                }
                let roll_count = self.session.world().map_or(0, |world| world.roll_count);
                if !outcome.events.is_empty() {
                    self.event_bus
                        .publish(Event::Gameplay(GameplayEvent::CommandResolved {
                            command,
                            roll_count,
                            events: outcome.events.clone(),
                        }));
                }
                if let Some(GameEvent::GameOver { reason }) = outcome
                    .events
                    .iter()
                    .find(|event| matches!(event, GameEvent::GameOver { .. }))
                {
                    info!(target: "runtime::worker", reason = ?reason, "Game over");
                    self.event_bus.publish(Event::Level(LevelEvent::GameOver {
                        reason: reason.clone(),
                    }));
                }
                if let Some(transition) = &outcome.transition {
                    self.event_bus
                        .publish(Event::Level(LevelEvent::Transition(transition.clone())));
                }
                if self.session.levels_loaded() != levels_before {
                    self.announce_state();
                }
            }
            Err(RuntimeError::Command(error)) => {
                debug!(target: "runtime::worker", ?command, error = %error, "Command rejected");
                self.event_bus
                    .publish(Event::Gameplay(GameplayEvent::CommandRejected {
                        command,
                        error_code: error.error_code().to_owned(),
                        error: error.to_string(),
                    }));
            }
            Err(_) => {}
        }
        result
    }

    fn announce_state(&self) {
        let event = match self.session.state() {
            SessionState::Playing(world) => LevelEvent::Loaded {
                key: world.level_key.clone(),
                level: self.session.levels_loaded(),
            },
            SessionState::Halted { message } => LevelEvent::Halted {
                message: message.clone(),
            },
        };
        self.event_bus.publish(Event::Level(event));
    }
}

/// Resolves on the next frame, or never when no frame timer is configured.
async fn next_frame(frames: &mut Option<Interval>) {
    match frames {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
