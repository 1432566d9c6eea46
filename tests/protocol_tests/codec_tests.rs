//! Codec Tests
//!
//! Tests for HTTP request parsing and response encoding.

use std::io::Cursor;

use goallog::protocol::{
    body_framing, encode_response, read_body, read_request, read_request_head, write_continue,
    BodyFraming, Method, Request, Response, StatusCode, MAX_HEADERS, MAX_HEAD_SIZE,
};
use goallog::GoalLogError;

const MAX_BODY: usize = 1024;

fn parse(raw: &str) -> goallog::Result<Request> {
    read_request(&mut Cursor::new(raw.as_bytes().to_vec()), MAX_BODY)
}

// =============================================================================
// Request Parsing Tests
// =============================================================================

#[test]
fn test_parse_simple_get() {
    let req = parse("GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();

    assert_eq!(req.method, Method::Get);
    assert_eq!(req.target, "/");
    assert_eq!(req.version, 1);
    assert_eq!(req.header("host"), Some("localhost"));
    assert!(req.body.is_empty());
}

#[test]
fn test_parse_post_with_body() {
    let body = r#"{"date":"2024-01-15"}"#;
    let raw = format!(
        "POST / HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
    let req = parse(&raw).unwrap();

    assert_eq!(req.method, Method::Post);
    assert_eq!(&req.body[..], body.as_bytes());
}

#[test]
fn test_parse_bare_lf_lines() {
    let req = parse("PUT /abc HTTP/1.0\nContent-Length: 2\n\n{}").unwrap();

    assert_eq!(req.method, Method::Put);
    assert_eq!(req.version, 0);
    assert_eq!(&req.body[..], b"{}");
}

#[test]
fn test_parse_unknown_method_is_kept() {
    let req = parse("PATCH /abc HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(req.method, Method::Other("PATCH".to_string()));

    let req = parse("HEAD /abc HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(req.method, Method::Head);
}

#[test]
fn test_parse_chunked_body() {
    let raw = "POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n6;ext=1\r\n world\r\n0\r\n\r\n";
    let req = parse(raw).unwrap();

    assert_eq!(&req.body[..], b"hello world");
}

#[test]
fn test_parse_pipelined_requests() {
    let raw = "GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n";
    let mut cursor = Cursor::new(raw.as_bytes().to_vec());

    let first = read_request(&mut cursor, MAX_BODY).unwrap();
    let second = read_request(&mut cursor, MAX_BODY).unwrap();

    assert_eq!(first.target, "/a");
    assert_eq!(second.target, "/b");
}

// =============================================================================
// Request Error Tests
// =============================================================================

#[test]
fn test_parse_empty_stream_is_eof() {
    match parse("") {
        Err(GoalLogError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("Expected EOF, got {:?}", other),
    }
}

#[test]
fn test_parse_malformed_request_line() {
    assert!(matches!(parse("GET /\r\n\r\n"), Err(GoalLogError::Protocol(_))));
    assert!(matches!(
        parse("GET / HTTP/2.0\r\n\r\n"),
        Err(GoalLogError::Protocol(_))
    ));
}

#[test]
fn test_parse_malformed_header() {
    assert!(matches!(
        parse("GET / HTTP/1.1\r\nno colon here\r\n\r\n"),
        Err(GoalLogError::Protocol(_))
    ));
}

#[test]
fn test_parse_invalid_content_length() {
    assert!(matches!(
        parse("POST / HTTP/1.1\r\nContent-Length: abc\r\n\r\n"),
        Err(GoalLogError::Protocol(_))
    ));
}

#[test]
fn test_parse_body_too_large() {
    let raw = format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n", MAX_BODY + 1);
    match parse(&raw) {
        Err(GoalLogError::PayloadTooLarge { size, max }) => {
            assert_eq!(size, MAX_BODY + 1);
            assert_eq!(max, MAX_BODY);
        }
        other => panic!("Expected PayloadTooLarge, got {:?}", other),
    }
}

#[test]
fn test_parse_truncated_body() {
    assert!(matches!(
        parse("POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc"),
        Err(GoalLogError::Io(_))
    ));
}

#[test]
fn test_parse_overlong_head() {
    let raw = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(MAX_HEAD_SIZE + 10));
    assert!(matches!(parse(&raw), Err(GoalLogError::Protocol(_))));
}

#[test]
fn test_parse_too_many_headers() {
    let mut raw = String::from("GET / HTTP/1.1\r\n");
    for i in 0..=MAX_HEADERS {
        raw.push_str(&format!("X-H{}: v\r\n", i));
    }
    raw.push_str("\r\n");

    assert!(matches!(parse(&raw), Err(GoalLogError::Protocol(_))));
}

#[test]
fn test_parse_head_arriving_in_pieces() {
    // A BufReader with a tiny buffer hands the head over a few bytes at a time
    let raw = b"POST /abc HTTP/1.1\r\nContent-Length: 2\r\n\r\n{}".to_vec();
    let mut reader = std::io::BufReader::with_capacity(4, Cursor::new(raw));

    let req = read_request(&mut reader, MAX_BODY).unwrap();

    assert_eq!(req.target, "/abc");
    assert_eq!(&req.body[..], b"{}");
}

#[test]
fn test_parse_chunked_body_too_large() {
    let raw = format!(
        "POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n{:x}\r\n",
        MAX_BODY + 1
    );
    assert!(matches!(
        parse(&raw),
        Err(GoalLogError::PayloadTooLarge { .. })
    ));
}

// =============================================================================
// Head / Body Split Tests
// =============================================================================

#[test]
fn test_head_then_body() {
    let raw = b"PUT /abc HTTP/1.1\r\nExpect: 100-continue\r\nContent-Length: 2\r\n\r\n{}".to_vec();
    let mut cursor = Cursor::new(raw);

    let head = read_request_head(&mut cursor).unwrap();
    assert!(head.body.is_empty());
    assert!(head.expects_continue());

    let framing = body_framing(&head, MAX_BODY).unwrap();
    assert_eq!(framing, BodyFraming::Sized(2));
    assert_eq!(&read_body(&mut cursor, framing, MAX_BODY).unwrap()[..], b"{}");
}

#[test]
fn test_expects_continue_needs_http11() {
    let http10 = parse("POST / HTTP/1.0\r\nExpect: 100-continue\r\n\r\n").unwrap();
    let plain = parse("POST / HTTP/1.1\r\n\r\n").unwrap();

    assert!(!http10.expects_continue());
    assert!(!plain.expects_continue());
}

#[test]
fn test_body_framing_checks_size_before_reading() {
    let head = Request::new(Method::Post, "/", "").with_header("Content-Length", "5000");
    assert!(matches!(
        body_framing(&head, MAX_BODY),
        Err(GoalLogError::PayloadTooLarge { size: 5000, .. })
    ));

    let empty = Request::new(Method::Post, "/", "").with_header("Content-Length", "0");
    assert_eq!(body_framing(&empty, MAX_BODY).unwrap(), BodyFraming::Empty);
}

#[test]
fn test_write_continue() {
    let mut buf = Vec::new();
    write_continue(&mut buf).unwrap();
    assert_eq!(buf, b"HTTP/1.1 100 Continue\r\n\r\n");
}

// =============================================================================
// Request Helpers Tests
// =============================================================================

#[test]
fn test_keep_alive_defaults() {
    let http11 = parse("GET / HTTP/1.1\r\n\r\n").unwrap();
    let http10 = parse("GET / HTTP/1.0\r\n\r\n").unwrap();
    let closing = parse("GET / HTTP/1.1\r\nConnection: close\r\n\r\n").unwrap();
    let kept = parse("GET / HTTP/1.0\r\nConnection: Keep-Alive\r\n\r\n").unwrap();

    assert!(http11.keep_alive());
    assert!(!http10.keep_alive());
    assert!(!closing.keep_alive());
    assert!(kept.keep_alive());
}

#[test]
fn test_path_strips_query() {
    let req = Request::new(Method::Get, "/abc?x=1&y=2", "");
    assert_eq!(req.path(), "/abc");
}

// =============================================================================
// Response Encoding Tests
// =============================================================================

#[test]
fn test_encode_json_response() {
    let response = Response::json(&vec![1, 2, 3]);
    let encoded = String::from_utf8(encode_response(&response, &Method::Get, true)).unwrap();

    assert_eq!(
        encoded,
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 8\r\n\r\n[1,2,3]\n"
    );
}

#[test]
fn test_encode_error_response() {
    let response = Response::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    let encoded = String::from_utf8(encode_response(&response, &Method::Get, false)).unwrap();

    assert_eq!(
        encoded,
        "HTTP/1.1 405 Method Not Allowed\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         X-Content-Type-Options: nosniff\r\n\
         Content-Length: 19\r\n\
         Connection: close\r\n\
         \r\n\
         Method not allowed\n"
    );
}

#[test]
fn test_encode_empty_response() {
    let encoded = String::from_utf8(encode_response(&Response::empty(), &Method::Get, true)).unwrap();
    assert_eq!(encoded, "HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
}

#[test]
fn test_empty_collection_encodes_as_array() {
    let logs: Vec<goallog::Log> = Vec::new();
    let response = Response::json(&logs);
    assert_eq!(response.text(), "[]");
}

#[test]
fn test_encode_head_response_omits_body() {
    let response = Response::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    let encoded = String::from_utf8(encode_response(&response, &Method::Head, true)).unwrap();

    assert!(encoded.contains("Content-Length: 19\r\n"));
    assert!(encoded.ends_with("\r\n\r\n"));
    assert!(!encoded.contains("Method not allowed"));
}
