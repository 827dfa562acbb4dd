//! Error types for swift-core
//!
//! Provides a unified error type shared by every storage operation, plus a
//! coarse classification that mirrors how callers are expected to react.

use thiserror::Error;

/// Result type alias for swift-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for storage operations
#[derive(Error, Debug)]
pub enum Error {
    /// Operation attempted before a successful connect
    #[error("Not connected: call connect() first")]
    NotConnected,

    /// Missing or empty name, path or payload argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The service answered with a non-success status
    #[error("Request failed with HTTP {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// The HTTP exchange could not complete (DNS, TLS, refused, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Authentication response was unusable
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Copy succeeded but the source could not be removed
    #[error("Move from {from} to {to} incomplete, copy left at destination: {cause}")]
    MoveIncomplete {
        from: String,
        to: String,
        #[source]
        cause: Box<Error>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// General error
    #[error("{0}")]
    General(String),
}

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotConnected,
    InvalidArgument,
    RequestFailed,
    TransportFailed,
    Other,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotConnected => ErrorKind::NotConnected,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::RequestFailed { .. } | Error::Auth(_) => ErrorKind::RequestFailed,
            Error::Transport(_) => ErrorKind::TransportFailed,
            Error::MoveIncomplete { cause, .. } => cause.kind(),
            _ => ErrorKind::Other,
        }
    }

    /// HTTP status code, when the service produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RequestFailed { status, .. } => Some(*status),
            Error::MoveIncomplete { cause, .. } => cause.status(),
            _ => None,
        }
    }

    /// Whether the service reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
