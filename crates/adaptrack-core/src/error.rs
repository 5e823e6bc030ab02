//! Error types for adaptrack-core.

use thiserror::Error;

/// Error type for adaptive tracking operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Empty parameter space passed for {0}")]
    EmptyParameterSpace(&'static str),

    #[error("Insufficient reversals to compute a threshold (requested {requested}, recorded {recorded})")]
    InsufficientReversals { requested: usize, recorded: usize },

    #[error("Adaptive method used before initialization")]
    NotInitialized,

    #[error("No target playlists found at {0}")]
    NoTargetPlaylists(String),

    #[error("Missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("Unknown tracking method: {0}")]
    UnknownMethod(String),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
