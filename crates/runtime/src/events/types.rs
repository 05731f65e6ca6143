//! Event types for different topics.

use game_core::{Command, GameEvent, LevelTransition};
use serde::{Deserialize, Serialize};

/// Events produced while the current level is played.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameplayEvent {
    /// A command ran to completion and produced these events.
    CommandResolved {
        command: Command,
        roll_count: u64,
        events: Vec<GameEvent>,
    },

    /// A command was refused and left the world unchanged.
    CommandRejected {
        command: Command,
        error_code: String,
        error: String,
    },
}

/// Level lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LevelEvent {
    Loaded { key: String, level: u64 },
    Transition(LevelTransition),
    /// Runner died; the world stays frozen until a new session starts.
    GameOver { reason: Option<String> },
    Halted { message: String },
}
