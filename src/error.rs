//! Error types for goallog
//!
//! Provides a unified error type for all operations. Request-level kinds
//! map onto an HTTP status through [`GoalLogError::status`].

use thiserror::Error;

use crate::protocol::StatusCode;

/// Result type alias using GoalLogError
pub type Result<T> = std::result::Result<T, GoalLogError>;

/// Unified error type for goallog operations
#[derive(Debug, Error)]
pub enum GoalLogError {
    // -------------------------------------------------------------------------
    // Request Errors (terminal for one request, never for the process)
    // -------------------------------------------------------------------------
    /// Body could not be decoded as a log; carries the decoder message
    #[error("{0}")]
    MalformedBody(String),

    #[error("invalid log")]
    InvalidLog,

    #[error("Could not find log with id: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid URL")]
    InvalidPath,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    // -------------------------------------------------------------------------
    // Client Errors
    // -------------------------------------------------------------------------
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GoalLogError {
    /// HTTP status a client sees for this error
    pub fn status(&self) -> StatusCode {
        match self {
            GoalLogError::MalformedBody(_) | GoalLogError::InvalidLog => StatusCode::BAD_REQUEST,
            GoalLogError::NotFound(_) | GoalLogError::InvalidPath => StatusCode::NOT_FOUND,
            GoalLogError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GoalLogError::Protocol(_) => StatusCode::BAD_REQUEST,
            GoalLogError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GoalLogError::Client(_) => StatusCode::BAD_GATEWAY,
            GoalLogError::Io(_) | GoalLogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
