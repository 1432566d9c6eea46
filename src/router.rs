//! Request Router
//!
//! Maps a request path onto the collection, a single log, or nothing.
//!
//! The decoded path is split on `/`:
//! - `/`            → collection
//! - `/{id}`        → one log
//! - anything with a second `/` (`/a/b`, `/a/`) → invalid

use percent_encoding::percent_decode_str;

use crate::error::{GoalLogError, Result};
use crate::protocol::Request;

/// Where a request is addressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The whole set of logs (`/`)
    Collection,

    /// One log by id (`/{id}`)
    Item(String),

    /// Any other path shape
    Invalid,
}

impl Route {
    /// Classify an already-decoded path
    pub fn parse(path: &str) -> Self {
        let mut parts = path.split('/');
        let _leading = parts.next();
        let segment = parts.next();

        match (segment, parts.next()) {
            (_, Some(_)) => Route::Invalid,
            (Some(id), None) if path != "/" => Route::Item(id.to_string()),
            _ => Route::Collection,
        }
    }

    /// Classify a request by its target, dropping the query string and
    /// percent-decoding the path first
    pub fn of(request: &Request) -> Result<Self> {
        let path = strip_authority(request.path());
        let decoded = percent_decode(path)?;
        Ok(Self::parse(&decoded))
    }
}

/// Reduce an absolute-form target (`http://host/x`) to its path
fn strip_authority(target: &str) -> &str {
    let rest = target
        .strip_prefix("http://")
        .or_else(|| target.strip_prefix("https://"));

    match rest {
        Some(rest) => rest.find('/').map(|i| &rest[i..]).unwrap_or("/"),
        None => target,
    }
}

/// Decode `%XX` escapes in a path
///
/// A `%` not followed by two hex digits is an error rather than a literal.
pub fn percent_decode(path: &str) -> Result<String> {
    let bytes = path.as_bytes();
    let malformed = bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !bytes
                .get(i + 1..i + 3)
                .map(|h| h.iter().all(u8::is_ascii_hexdigit))
                .unwrap_or(false)
    });
    if malformed {
        return Err(GoalLogError::Protocol(format!("Invalid escape in path: {:?}", path)));
    }

    percent_decode_str(path)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| GoalLogError::Protocol(format!("Path is not valid UTF-8: {:?}", path)))
}
