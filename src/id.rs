//! ID Generator
//!
//! Ids are the current Unix time in lowercase hex followed by a random
//! base-36 suffix, e.g. `6710b2c4k3z09qa`. Unique for the life of one
//! process with overwhelming probability, not by construction.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

/// Suffix grows one digit at a time while its length is at most this
const SUFFIX_MIN_LEN: usize = 6;

/// Source of fresh record ids
pub trait IdGenerator: Send + Sync {
    /// Produce a new id
    fn next_id(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_id(&self) -> String {
        self()
    }
}

/// Default generator: hex timestamp plus random base-36 suffix
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampIdGenerator;

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self) -> String {
        generate()
    }
}

/// Generate an id from the system clock and thread-local entropy
pub fn generate() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    generate_with(secs, &mut rand::thread_rng())
}

/// Generate an id for a given timestamp using the supplied rng
pub fn generate_with<R: Rng + ?Sized>(unix_secs: u64, rng: &mut R) -> String {
    let mut suffix = String::with_capacity(SUFFIX_MIN_LEN + 1);
    while suffix.len() <= SUFFIX_MIN_LEN {
        let digit = rng.gen_range(0..36u32);
        // from_digit only fails for digit >= radix
        if let Some(c) = char::from_digit(digit, 36) {
            suffix.push(c);
        }
    }

    format!("{:x}{}", unix_secs, suffix)
}
