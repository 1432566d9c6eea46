//! Blocking client
//!
//! A thin layer over `reqwest::blocking` that speaks the service's own
//! `Request` / `Response` types.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::error::{GoalLogError, Result};
use crate::model::Log;
use crate::protocol::{
    Method, Request, Response, StatusCode, CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT,
};

/// Characters left as-is in an id path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Client for a goallog server
#[derive(Debug, Clone)]
pub struct Client {
    /// `http://host:port`, no trailing slash
    base_url: String,

    http: reqwest::blocking::Client,
}

impl Client {
    /// Create a client for the given address with a 5 second timeout
    pub fn new(addr: impl Into<String>) -> Result<Self> {
        Self::with_timeout(addr, Some(Duration::from_secs(5)))
    }

    /// Create a client with a per-call timeout (`None` blocks forever)
    pub fn with_timeout(addr: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let addr = addr.into();
        let base_url = if addr.starts_with("http://") {
            addr.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", addr.trim_end_matches('/'))
        };

        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self { base_url, http })
    }

    /// Send a raw request and read the response
    pub fn send(&self, request: Request) -> Result<Response> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| GoalLogError::Protocol(format!("Invalid method: {}", e)))?;

        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, request.target));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() || matches!(request.method, Method::Post | Method::Put) {
            builder = builder.body(request.body.to_vec());
        }

        let reply = builder.send()?;

        let content_type = match reply.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
            Some(CONTENT_TYPE_JSON) => Some(CONTENT_TYPE_JSON),
            Some(CONTENT_TYPE_TEXT) => Some(CONTENT_TYPE_TEXT),
            _ => None,
        };
        let status = reply.status();
        let body = reply.bytes()?;

        Ok(Response {
            status,
            content_type,
            body,
        })
    }

    /// GET /
    pub fn list(&self) -> Result<Response> {
        self.send(Request::new(Method::Get, "/", ""))
    }

    /// GET /{id}
    pub fn get(&self, id: &str) -> Result<Response> {
        self.send(Request::new(Method::Get, item_target(id), ""))
    }

    /// POST / with the log as JSON
    pub fn create(&self, log: &Log) -> Result<Response> {
        self.send(json_request(Method::Post, "/".to_string(), log)?)
    }

    /// PUT /{id} with the log as JSON
    pub fn update(&self, id: &str, log: &Log) -> Result<Response> {
        self.send(json_request(Method::Put, item_target(id), log)?)
    }
}

/// Decode a successful JSON response, or turn an error response into an error
pub fn decode_json<T: DeserializeOwned>(response: &Response) -> Result<T> {
    if response.status != StatusCode::OK {
        return Err(GoalLogError::Protocol(format!(
            "{} {}",
            response.status.as_u16(),
            response.text()
        )));
    }

    serde_json::from_slice(&response.body).map_err(|e| GoalLogError::MalformedBody(e.to_string()))
}

fn json_request(method: Method, target: String, log: &Log) -> Result<Request> {
    let body = serde_json::to_vec(log).map_err(|e| GoalLogError::MalformedBody(e.to_string()))?;
    Ok(Request::new(method, target, body).with_header("Content-Type", CONTENT_TYPE_JSON))
}

/// Percent-encode an id as a single path segment
fn item_target(id: &str) -> String {
    format!("/{}", utf8_percent_encode(id, SEGMENT))
}
