//! Response definitions
//!
//! Represents responses to clients.

use bytes::Bytes;
use http::StatusCode;
use serde::Serialize;

use crate::error::GoalLogError;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// A response to send to client
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: StatusCode,

    /// Content type, absent for empty responses
    pub content_type: Option<&'static str>,

    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a 200 response carrying a JSON value plus trailing newline
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(mut body) => {
                body.push(b'\n');
                Self {
                    status: StatusCode::OK,
                    content_type: Some(CONTENT_TYPE_JSON),
                    body: Bytes::from(body),
                }
            }
            Err(e) => Self::error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        }
    }

    /// Create a plain-text error response
    pub fn error(status: StatusCode, message: &str) -> Self {
        let mut body = Vec::with_capacity(message.len() + 1);
        body.extend_from_slice(message.as_bytes());
        body.push(b'\n');

        Self {
            status,
            content_type: Some(CONTENT_TYPE_TEXT),
            body: Bytes::from(body),
        }
    }

    /// Create a 200 response with no body and no content type
    pub fn empty() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: None,
            body: Bytes::new(),
        }
    }

    /// Render an error with its status and message
    pub fn from_error(error: &GoalLogError) -> Self {
        Self::error(error.status(), &error.to_string())
    }

    /// Body as text, without the trailing newline
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.body)
            .unwrap_or_default()
            .trim_end_matches('\n')
    }
}
