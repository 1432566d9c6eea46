//! Protocol Module
//!
//! HTTP/1.1 framing for the log service (server side). Heads are parsed
//! by `httparse`; status codes come from the `http` crate.
//!
//! ## Request Format
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ METHOD SP target SP HTTP/1.x CRLF            │
//! ├──────────────────────────────────────────────┤
//! │ Name: value CRLF        (repeated)           │
//! │ CRLF                                         │
//! ├──────────────────────────────────────────────┤
//! │ Body (Content-Length or chunked)             │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! With `Expect: 100-continue` the server answers `100 Continue` between
//! the head and the body.
//!
//! ## Response Format
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ HTTP/1.1 SP code SP reason CRLF              │
//! │ Content-Type / Content-Length / ... CRLF     │
//! │ CRLF                                         │
//! │ Body (omitted for HEAD)                      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Bodies
//! - Success: JSON value followed by a newline
//! - Error: plain-text message followed by a newline

mod request;
mod response;
mod codec;

pub use request::{Method, Request};
pub use response::{Response, CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT};
pub use http::StatusCode;
pub use codec::{
    body_framing, encode_response, read_body, read_request, read_request_head, write_continue,
    write_response, BodyFraming, MAX_HEADERS, MAX_HEAD_SIZE,
};
