//! Error types for the webhook
//!
//! This module defines all error types used throughout the workspace.
//!
//! Errors raised while talking to the DNS backend carry the name of the
//! operation that produced them (`ListZones`, `CreateRecord`, ...) so that a
//! failure can always be traced back to the call site.

use thiserror::Error;

/// Result type alias for webhook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the webhook
#[derive(Error, Debug)]
pub enum Error {
    /// The backend could not be reached, or the response body could not be read
    #[error("{operation}: transport error: {message}")]
    Transport {
        /// Operation that issued the call
        operation: String,
        /// Underlying transport failure
        message: String,
    },

    /// The login call that precedes every backend request failed
    #[error("{operation}: authentication failed: {message}")]
    Authentication {
        /// Operation the login was performed for
        operation: String,
        /// Why the login failed
        message: String,
    },

    /// The backend answered with an envelope whose status is not "ok"
    #[error("{operation}: response status not 'ok': {status}, {message}")]
    Backend {
        /// Operation that issued the call
        operation: String,
        /// Envelope status as returned by the backend
        status: String,
        /// Backend error message
        message: String,
        /// Backend stack trace, when provided
        stack_trace: Option<String>,
        /// Backend inner error message, when provided
        inner_message: Option<String>,
    },

    /// The response body was not the shape the operation expected
    #[error("{operation}: decode error: {message}")]
    Decode {
        /// Operation that issued the call
        operation: String,
        /// Decoder failure
        message: String,
    },

    /// A record operation was requested for a type the provider cannot map
    #[error("Unsupported record type: {0}")]
    UnsupportedRecordType(String),

    /// One or more record operations of a change batch failed
    #[error(
        "{} of {} record operations failed: {}",
        .failures.len(),
        .attempted,
        .failures.join("; ")
    )]
    PartialApply {
        /// Number of record operations attempted
        attempted: usize,
        /// One message per failed record operation
        failures: Vec<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: msg.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Authentication {
            operation: operation.into(),
            message: msg.into(),
        }
    }

    /// Create a decode error
    pub fn decode(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            operation: operation.into(),
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an unsupported record type error
    pub fn unsupported_record_type(record_type: impl Into<String>) -> Self {
        Self::UnsupportedRecordType(record_type.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
