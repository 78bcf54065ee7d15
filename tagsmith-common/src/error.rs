//! Common error types for tagsmith

use thiserror::Error;

/// Common result type for tagsmith operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across tagsmith crates
///
/// Domain failures (incomplete metadata, unknown tracking ids, service
/// refusals) are NOT errors: they travel as typed reply messages between
/// actors. This enum covers infrastructure failures only.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An actor's mailbox is closed or its reply channel was dropped
    #[error("Actor unavailable: {0}")]
    ActorUnavailable(&'static str),

    /// Invalid input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
