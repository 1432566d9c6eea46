//! Validator and ID Generator Tests

use rand::rngs::StdRng;
use rand::SeedableRng;

use goallog::id::{generate, generate_with, IdGenerator, TimestampIdGenerator};
use goallog::validate::{validate, validate_date};
use goallog::Log;

// =============================================================================
// Date Validation Tests
// =============================================================================

#[test]
fn test_valid_dates() {
    assert!(validate_date("2024-01-15"));
    assert!(validate_date("1999-12-31"));
    assert!(validate_date("0001-01-01"));
}

#[test]
fn test_leap_days() {
    assert!(validate_date("2024-02-29"));
    assert!(validate_date("2000-02-29"));
    assert!(!validate_date("2023-02-29"));
    assert!(!validate_date("1900-02-29"));
}

#[test]
fn test_out_of_range_fields() {
    assert!(!validate_date("2024-13-40"));
    assert!(!validate_date("2024-00-10"));
    assert!(!validate_date("2024-04-31"));
    assert!(!validate_date("2024-01-00"));
}

#[test]
fn test_unpadded_fields_rejected() {
    assert!(!validate_date("2024-1-15"));
    assert!(!validate_date("2024-01-5"));
    assert!(!validate_date("24-01-15"));
}

#[test]
fn test_wrong_shape_rejected() {
    assert!(!validate_date(""));
    assert!(!validate_date("2024/01/15"));
    assert!(!validate_date("2024-01-15T00:00:00Z"));
    assert!(!validate_date(" 2024-01-15"));
    assert!(!validate_date("+024-01-15"));
    assert!(!validate_date("not a date"));
}

#[test]
fn test_only_date_is_checked() {
    let mut log = Log::new("2024-01-15", "", "", false);
    log.id = String::new();
    assert!(validate(&log));

    let log = Log::new("2024-13-40", "fine notes", "fine goal", true);
    assert!(!validate(&log));
}

// =============================================================================
// ID Generator Tests
// =============================================================================

#[test]
fn test_id_layout() {
    let mut rng = StdRng::seed_from_u64(7);
    let id = generate_with(0x6710_b2c4, &mut rng);

    assert!(id.starts_with("6710b2c4"));
    let suffix = &id["6710b2c4".len()..];
    assert_eq!(suffix.len(), 7);
    assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[test]
fn test_id_same_seed_same_id() {
    let a = generate_with(42, &mut StdRng::seed_from_u64(1));
    let b = generate_with(42, &mut StdRng::seed_from_u64(1));
    assert_eq!(a, b);
    assert!(a.starts_with("2a"));
}

#[test]
fn test_generated_ids_are_non_empty_and_distinct() {
    let a = generate();
    let b = TimestampIdGenerator.next_id();

    assert!(a.len() > 7);
    assert!(!b.is_empty());
    assert_ne!(a, b);
}
