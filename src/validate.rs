//! Validator
//!
//! A log is valid when its date is a real calendar date written exactly
//! as `YYYY-MM-DD`. No other field is looked at.

use chrono::NaiveDate;

use crate::model::Log;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Check a log before it is written to the store
pub fn validate(log: &Log) -> bool {
    validate_date(&log.date)
}

/// Check a date string against `YYYY-MM-DD`
///
/// chrono accepts unpadded and signed fields, so the shape is checked
/// byte by byte before the calendar check.
pub fn validate_date(date: &str) -> bool {
    let bytes = date.as_bytes();
    if bytes.len() != 10 {
        return false;
    }

    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });

    shape_ok && NaiveDate::parse_from_str(date, DATE_FORMAT).is_ok()
}
