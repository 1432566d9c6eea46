//! Router Tests
//!
//! Tests for path classification and percent-decoding.

use goallog::protocol::{Method, Request};
use goallog::router::{percent_decode, Route};

fn get(target: &str) -> Request {
    Request::new(Method::Get, target, "")
}

// =============================================================================
// Path Shape Tests
// =============================================================================

#[test]
fn test_root_is_collection() {
    assert_eq!(Route::parse("/"), Route::Collection);
}

#[test]
fn test_single_segment_is_item() {
    assert_eq!(Route::parse("/abc123"), Route::Item("abc123".to_string()));
}

#[test]
fn test_two_segments_are_invalid() {
    assert_eq!(Route::parse("/a/b"), Route::Invalid);
    assert_eq!(Route::parse("/a/b/c"), Route::Invalid);
}

#[test]
fn test_trailing_slash_is_invalid() {
    assert_eq!(Route::parse("/abc/"), Route::Invalid);
}

#[test]
fn test_double_slash_is_invalid() {
    assert_eq!(Route::parse("//"), Route::Invalid);
}

#[test]
fn test_dot_segments_are_not_cleaned() {
    // No redirect to a cleaned path; the raw split decides
    assert_eq!(Route::parse("/./x"), Route::Invalid);
    assert_eq!(Route::parse("/../x"), Route::Invalid);
    assert_eq!(Route::parse("/.."), Route::Item("..".to_string()));
}

#[test]
fn test_empty_path_is_collection() {
    assert_eq!(Route::parse(""), Route::Collection);
}

// =============================================================================
// Target Handling Tests
// =============================================================================

#[test]
fn test_query_string_is_ignored() {
    assert_eq!(Route::of(&get("/?page=2")).unwrap(), Route::Collection);
    assert_eq!(
        Route::of(&get("/abc?x=1")).unwrap(),
        Route::Item("abc".to_string())
    );
}

#[test]
fn test_escaped_id_is_decoded() {
    assert_eq!(
        Route::of(&get("/my%20log")).unwrap(),
        Route::Item("my log".to_string())
    );
}

#[test]
fn test_escaped_slash_counts_as_separator() {
    assert_eq!(Route::of(&get("/a%2Fb")).unwrap(), Route::Invalid);
}

#[test]
fn test_absolute_form_target() {
    assert_eq!(
        Route::of(&get("http://localhost:8080/abc")).unwrap(),
        Route::Item("abc".to_string())
    );
    assert_eq!(
        Route::of(&get("http://localhost:8080")).unwrap(),
        Route::Collection
    );
}

#[test]
fn test_bad_escape_is_error() {
    assert!(Route::of(&get("/abc%zz")).is_err());
    assert!(Route::of(&get("/abc%2")).is_err());
    assert!(percent_decode("/%+f").is_err());
}

#[test]
fn test_percent_decode_plain_path() {
    assert_eq!(percent_decode("/plain-id").unwrap(), "/plain-id");
    assert_eq!(percent_decode("/caf%C3%A9").unwrap(), "/café");
}
