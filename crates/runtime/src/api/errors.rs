//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, tile acquisition and rejected
//! commands so clients can bubble them up with consistent context.
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{CommandError, ErrorSeverity, GameError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The session could not load any level; only the boot message remains.
    #[error("session halted: {message}")]
    Halted { message: String },

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Rejected moves the player can fix by rolling or choosing again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RuntimeError::Command(err) => err.severity() == ErrorSeverity::Recoverable,
            _ => false,
        }
    }
}

/// Failure of a single tile source. The next source is tried.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read tile table {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tile table from {origin} is invalid: {message}")]
    Parse { origin: String, message: String },

    #[error("tile source {origin} timed out after {timeout:?}")]
    Timeout { origin: String, timeout: Duration },
}
