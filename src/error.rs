//! Centralized error type for the adaptrack umbrella crate.
//!
//! Wraps subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] adaptrack_core::Error),

    #[error("Settings output: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Raised by collaborators (playlist readers, output files).
    #[error("{0}")]
    Collaborator(String),
}

pub type Result<T> = std::result::Result<T, Error>;
