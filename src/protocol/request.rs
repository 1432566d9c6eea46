//! Request definitions
//!
//! Represents requests from clients.

use bytes::Bytes;

/// Request methods
///
/// Anything the service does not route on is kept verbatim in `Other`
/// so the handlers can answer 405 instead of the codec rejecting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Other(String),
}

impl Method {
    /// Parse a request-line method token
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Other(token) => token,
        }
    }
}

/// A parsed request
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,

    /// Request target as sent (path plus optional query)
    pub target: String,

    /// Minor HTTP version (0 or 1)
    pub version: u8,

    /// Header fields in arrival order, names as sent
    pub headers: Vec<(String, String)>,

    /// Decoded body (empty when none was sent)
    pub body: Bytes,
}

impl Request {
    /// Create a request with no headers
    pub fn new(method: Method, target: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            target: target.into(),
            version: 1,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header (builder style)
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header value with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Path part of the target, without the query string
    pub fn path(&self) -> &str {
        match self.target.split_once('?') {
            Some((path, _)) => path,
            None => &self.target,
        }
    }

    /// Whether the client waits for `100 Continue` before sending the body
    pub fn expects_continue(&self) -> bool {
        self.version >= 1
            && self
                .header("Expect")
                .map(|v| v.trim().eq_ignore_ascii_case("100-continue"))
                .unwrap_or(false)
    }

    /// Whether the client expects the connection to stay open
    pub fn keep_alive(&self) -> bool {
        let connection = self.header("Connection").map(|v| v.to_ascii_lowercase());
        match connection.as_deref() {
            Some(v) if v.contains("close") => false,
            Some(v) if v.contains("keep-alive") => true,
            _ => self.version >= 1,
        }
    }
}
