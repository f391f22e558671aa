//! Error types for stepviz-engine.

use stepviz_structures::StructureError;
use thiserror::Error;

use crate::playback::{PlaybackEvent, PlaybackState};

/// Result type for controller operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors returned to the interactive context by the controller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A run is already active on this screen instance.
    #[error("a run is already in progress")]
    RunInProgress,

    /// The state machine does not accept the event in its current state.
    #[error("cannot {event} while {state}")]
    InvalidTransition {
        state: PlaybackState,
        event: PlaybackEvent,
    },

    /// The controller was torn down and no longer accepts runs.
    #[error("controller has been detached")]
    Detached,

    /// There is no run to complete.
    #[error("no run is active")]
    NoActiveRun,

    /// The worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The worker thread panicked; its operand is lost.
    #[error("worker thread panicked")]
    WorkerPanicked,
}

/// Errors that end a run early. Reported to the sink and returned on join.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// A structure mutation rejected its position.
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// The run was detached and stopped at a checkpoint.
    #[error("run cancelled")]
    Cancelled,

    /// The algorithm body panicked.
    #[error("algorithm panicked: {0}")]
    Panicked(String),
}
