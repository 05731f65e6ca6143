//! Errors for rejected commands.
//!
//! A rejected command leaves the world untouched.

use crate::error::{ErrorSeverity, GameError};
use crate::state::InsufficientMovement;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error("the game is over")]
    GameOver,

    #[error("no movement points left, roll the dice")]
    NoMovementPoints,

    #[error(transparent)]
    InsufficientMovement(#[from] InsufficientMovement),

    #[error("no jump credit left")]
    NoJumpCredit,
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CommandError::GameOver => ErrorSeverity::Fatal,
            CommandError::NoMovementPoints
            | CommandError::InsufficientMovement(_)
            | CommandError::NoJumpCredit => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CommandError::GameOver => "COMMAND_GAME_OVER",
            CommandError::NoMovementPoints => "COMMAND_NO_MOVEMENT_POINTS",
            CommandError::InsufficientMovement(_) => "COMMAND_INSUFFICIENT_MOVEMENT",
            CommandError::NoJumpCredit => "COMMAND_NO_JUMP_CREDIT",
        }
    }
}
