//! Error types for gfx_api
//!
//! Only recoverable failures are represented here: native allocation failures,
//! engine state errors and raw values rejected at the API boundary.
//! Contract violations by the caller are fatal (see `engine_fatal!`).

use std::fmt;

/// Result type for gfx_api operations
pub type Result<T> = std::result::Result<T, Error>;

/// gfx_api errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific error (native handle allocation, driver refusal, etc.)
    BackendError(String),

    /// Invalid resource request (zero-sized texture, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, context)
    InitializationFailed(String),

    /// Raw value that does not name any variant of a closed enum
    InvalidValue(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
