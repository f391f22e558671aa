//! Errors reported by screens and sessions.

use stepviz_algorithms::{InputError, OperationKind, ScreenKind};
use stepviz_engine::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScreenError>;

/// A rejected user action. Reported once; the screen stays usable.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("{operation} is not offered on the {screen} screen")]
    Unsupported {
        screen: ScreenKind,
        operation: OperationKind,
    },

    #[error("no screen is open")]
    NoScreen,

    #[error("advance is only available in step mode while running")]
    AdvanceRejected,

    #[error("terminal output failed: {0}")]
    Io(#[from] std::io::Error),
}
