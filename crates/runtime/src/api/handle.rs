//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the runner or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{Command as GameCommand, DieSlot, Direction, Outcome, World};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Execute one game command and wait for its outcome.
    pub async fn execute(&self, command: GameCommand) -> Result<Outcome> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Execute {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    pub async fn move_runner(&self, direction: Direction) -> Result<Outcome> {
        self.execute(GameCommand::Move(direction)).await
    }

    pub async fn roll(&self) -> Result<Outcome> {
        self.execute(GameCommand::Roll).await
    }

    pub async fn select_die(&self, slot: DieSlot) -> Result<Outcome> {
        self.execute(GameCommand::SelectDie(slot)).await
    }

    /// Advance one render frame.
    pub async fn tick(&self) -> Result<Outcome> {
        self.execute(GameCommand::Tick).await
    }

    /// Query the current world (read-only snapshot)
    pub async fn query_world(&self) -> Result<World> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryWorld { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Gameplay` - Command results and rejections
    /// - `Topic::Level` - Level loads, transitions, game over, boot errors
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
