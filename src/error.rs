//! Typed error kinds for the solver.
//!
//! Library APIs return these; the C boundary collapses everything to a
//! boolean with diagnostics on stderr.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("invalid public key: {0}")]
    InvalidPubKey(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("invalid point encoding: {0}")]
    InvalidPoint(String),

    #[error("invalid hex scalar: {0}")]
    InvalidHex(String),

    #[error("solver is already running")]
    AlreadyRunning,

    #[error("solver is not initialized")]
    NotInitialized,

    #[error("checkpoint I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint parse: {0}")]
    Json(#[from] serde_json::Error),

    #[error("checkpoint format: {0}")]
    CheckpointFormat(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;
