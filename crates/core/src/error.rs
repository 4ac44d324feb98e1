//! Unified error types for beacon.
//!
//! Each variant renders with a stable upper-snake code prefix so callers
//! (and the MCP layer) can match on the kind without parsing prose.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

use crate::credentials::Provider;

/// Unified error types for resolution, caching and credential rotation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty origin list entry).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Origin could not be turned into an http(s) URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Identifier matches none of the supported shapes.
    #[error("INVALID_IDENTIFIER: {0}")]
    InvalidIdentifier(String),

    /// Network failure or non-success HTTP status.
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),

    /// Fetch exceeded its timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    Timeout(String),

    /// Declared content type did not match what the stage expected.
    #[error("CLASSIFICATION_MISMATCH: expected {expected}, got {actual}")]
    ClassificationMismatch { expected: String, actual: String },

    /// Expected resource was absent (e.g., an index page without an icon link).
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Provider answered with a well-formed body carrying an error.
    #[error("PROVIDER_REJECTION: {provider}: {message}")]
    ProviderRejection { provider: String, message: String },

    /// Credential rotation hit its bound.
    #[error("RETRY_BUDGET_EXHAUSTED: gave up after {attempts} attempts: {last}")]
    RetryBudgetExhausted { attempts: u32, last: String },

    /// The provider's credential pool is empty.
    #[error("NO_CREDENTIALS: no tokens left for {0}")]
    NoCredentials(Provider),

    /// The same request target is already being resolved.
    #[error("DUPLICATE_IN_FLIGHT: {0}")]
    DuplicateInFlight(String),

    /// Provider body could not be decoded.
    #[error("DECODE_ERROR: {0}")]
    Decode(String),

    /// Durable store operation failed.
    #[error("STORAGE_ERROR: {0}")]
    Storage(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORAGE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl Error {
    /// Whether this is a transport-level failure. These are never answered
    /// with credential rotation.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Storage(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Storage(tokio_rusqlite::Error::Close(c)),
            _ => Error::Storage(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Storage(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) | Error::InvalidUrl(_) | Error::InvalidIdentifier(_) => -32602,
            Error::Transport(_) => -32008,
            Error::Timeout(_) => -32006,
            Error::ClassificationMismatch { .. } => -32013,
            Error::NotFound(_) => -32001,
            Error::ProviderRejection { .. } => -32014,
            Error::RetryBudgetExhausted { .. } => -32015,
            Error::NoCredentials(_) => -32016,
            Error::DuplicateInFlight(_) => -32017,
            Error::Decode(_) => -32018,
            Error::Storage(_) | Error::MigrationFailed(_) => -32002,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
