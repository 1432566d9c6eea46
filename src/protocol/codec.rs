//! HTTP codec
//!
//! Reading requests and writing responses over buffered streams. The
//! request head is parsed with `httparse`; the body is read separately so
//! the connection can answer `Expect: 100-continue` in between.

use std::io::{self, BufRead, Read, Write};

use bytes::Bytes;

use crate::error::{GoalLogError, Result};
use super::{Method, Request, Response, CONTENT_TYPE_TEXT};

/// Largest request head accepted (request line plus headers, in bytes)
pub const MAX_HEAD_SIZE: usize = 16 * 1024;

/// Maximum number of header fields per request
pub const MAX_HEADERS: usize = 100;

/// Longest chunk-size or trailer line accepted
const MAX_CHUNK_LINE: usize = 1024;

/// How the body of a request is delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    /// No body
    Empty,

    /// `Content-Length` bytes
    Sized(usize),

    /// `Transfer-Encoding: chunked`
    Chunked,
}

fn unexpected_eof() -> GoalLogError {
    io::Error::from(io::ErrorKind::UnexpectedEof).into()
}

// =============================================================================
// Request Head
// =============================================================================

/// Read a request line and headers
///
/// The returned request has an empty body; see [`body_framing`] and
/// [`read_body`]. Blank lines before the request line are skipped.
pub fn read_request_head<R: BufRead>(reader: &mut R) -> Result<Request> {
    let mut buf: Vec<u8> = Vec::new();

    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Err(unexpected_eof());
        }

        let already_consumed = buf.len();
        let take = available.len().min(MAX_HEAD_SIZE + 1 - buf.len());
        buf.extend_from_slice(&available[..take]);

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut parsed = httparse::Request::new(&mut headers);
        let status = parsed
            .parse(&buf)
            .map_err(|e| GoalLogError::Protocol(format!("Malformed request head: {}", e)))?;

        match status {
            httparse::Status::Complete(head_len) if head_len <= MAX_HEAD_SIZE => {
                let request = build_request(&parsed);
                reader.consume(head_len.saturating_sub(already_consumed));
                return Ok(request);
            }
            httparse::Status::Partial if buf.len() <= MAX_HEAD_SIZE => {
                reader.consume(take);
            }
            _ => {
                return Err(GoalLogError::Protocol(format!(
                    "Request head too large (max {} bytes)",
                    MAX_HEAD_SIZE
                )));
            }
        }
    }
}

fn build_request(parsed: &httparse::Request<'_, '_>) -> Request {
    let headers = parsed
        .headers
        .iter()
        .map(|h| {
            (
                h.name.to_string(),
                String::from_utf8_lossy(h.value).trim().to_string(),
            )
        })
        .collect();

    Request {
        method: Method::parse(parsed.method.unwrap_or_default()),
        target: parsed.path.unwrap_or("/").to_string(),
        version: parsed.version.unwrap_or(1),
        headers,
        body: Bytes::new(),
    }
}

// =============================================================================
// Request Body
// =============================================================================

/// Work out how the body of `request` is delimited
///
/// A declared length above `max_body_size` is rejected here, before
/// anything is read.
pub fn body_framing(request: &Request, max_body_size: usize) -> Result<BodyFraming> {
    let chunked = request
        .header("Transfer-Encoding")
        .map(|v| v.to_ascii_lowercase().contains("chunked"))
        .unwrap_or(false);
    if chunked {
        return Ok(BodyFraming::Chunked);
    }

    let Some(value) = request.header("Content-Length") else {
        return Ok(BodyFraming::Empty);
    };

    let len = value
        .parse::<usize>()
        .map_err(|_| GoalLogError::Protocol(format!("Invalid Content-Length: {:?}", value)))?;

    if len > max_body_size {
        return Err(GoalLogError::PayloadTooLarge {
            size: len,
            max: max_body_size,
        });
    }

    Ok(if len == 0 {
        BodyFraming::Empty
    } else {
        BodyFraming::Sized(len)
    })
}

/// Read a body delimited as `framing`
pub fn read_body<R: BufRead>(
    reader: &mut R,
    framing: BodyFraming,
    max_body_size: usize,
) -> Result<Bytes> {
    match framing {
        BodyFraming::Empty => Ok(Bytes::new()),
        BodyFraming::Sized(len) => {
            let mut body = Vec::with_capacity(len.min(max_body_size));
            reader.by_ref().take(len as u64).read_to_end(&mut body)?;
            if body.len() < len {
                return Err(unexpected_eof());
            }
            Ok(Bytes::from(body))
        }
        BodyFraming::Chunked => read_chunked_body(reader, max_body_size),
    }
}

/// Read one line of at most `limit` bytes, terminator included
fn read_line<R: BufRead>(reader: &mut R, limit: usize) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    reader
        .by_ref()
        .take(limit as u64)
        .read_until(b'\n', &mut line)?;

    if line.last() == Some(&b'\n') {
        return Ok(line);
    }
    if line.len() >= limit {
        return Err(GoalLogError::Protocol(format!(
            "Line too long (max {} bytes)",
            limit
        )));
    }
    Err(unexpected_eof())
}

fn is_blank_line(line: &[u8]) -> bool {
    line == b"\r\n" || line == b"\n"
}

/// Read a chunked body, discarding chunk extensions and trailers
fn read_chunked_body<R: BufRead>(reader: &mut R, max: usize) -> Result<Bytes> {
    let mut body = Vec::new();

    loop {
        let line = read_line(reader, MAX_CHUNK_LINE)?;
        let size = match httparse::parse_chunk_size(&line) {
            Ok(httparse::Status::Complete((_, size))) => size,
            Ok(httparse::Status::Partial) => return Err(unexpected_eof()),
            Err(_) => {
                return Err(GoalLogError::Protocol(format!(
                    "Invalid chunk size line: {:?}",
                    String::from_utf8_lossy(&line).trim_end()
                )))
            }
        };

        if size == 0 {
            // Trailer section ends with a blank line
            while !is_blank_line(&read_line(reader, MAX_CHUNK_LINE)?) {}
            return Ok(Bytes::from(body));
        }

        let total = usize::try_from(size)
            .unwrap_or(usize::MAX)
            .saturating_add(body.len());
        if total > max {
            return Err(GoalLogError::PayloadTooLarge { size: total, max });
        }

        let start = body.len();
        body.resize(total, 0);
        reader.read_exact(&mut body[start..])?;

        if !is_blank_line(&read_line(reader, MAX_CHUNK_LINE)?) {
            return Err(GoalLogError::Protocol("Missing CRLF after chunk".to_string()));
        }
    }
}

/// Read a complete request from a stream
///
/// Blocks until a complete request is received or an error occurs.
/// Bodies larger than `max_body_size` are rejected before being read.
pub fn read_request<R: BufRead>(reader: &mut R, max_body_size: usize) -> Result<Request> {
    let mut request = read_request_head(reader)?;
    let framing = body_framing(&request, max_body_size)?;
    request.body = read_body(reader, framing, max_body_size)?;
    Ok(request)
}

// =============================================================================
// Responses
// =============================================================================

/// Write the interim `100 Continue` response
pub fn write_continue<W: Write>(writer: &mut W) -> Result<()> {
    writer.write_all(b"HTTP/1.1 100 Continue\r\n\r\n")?;
    writer.flush()?;
    Ok(())
}

/// Encode a response to bytes
///
/// `keep_alive = false` adds `Connection: close`. A response to `HEAD`
/// keeps its `Content-Length` but carries no body.
pub fn encode_response(response: &Response, method: &Method, keep_alive: bool) -> Vec<u8> {
    let mut head = format!(
        "HTTP/1.1 {} {}\r\n",
        response.status.as_u16(),
        response.status.canonical_reason().unwrap_or("")
    );

    if let Some(content_type) = response.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", content_type));
        if content_type == CONTENT_TYPE_TEXT {
            head.push_str("X-Content-Type-Options: nosniff\r\n");
        }
    }
    head.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    if !keep_alive {
        head.push_str("Connection: close\r\n");
    }
    head.push_str("\r\n");

    let mut message = Vec::with_capacity(head.len() + response.body.len());
    message.extend_from_slice(head.as_bytes());
    if *method != Method::Head {
        message.extend_from_slice(&response.body);
    }
    message
}

/// Write a response to a stream
pub fn write_response<W: Write>(
    writer: &mut W,
    response: &Response,
    method: &Method,
    keep_alive: bool,
) -> Result<()> {
    let bytes = encode_response(response, method, keep_alive);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
