//! Record identifier generation
//!
//! Identifiers are a kind prefix joined with the creation time in unix
//! milliseconds. Imported rows also get a short random suffix because a
//! whole batch shares one timestamp. Nothing checks uniqueness beyond that.

use chrono::{DateTime, TimeZone};
use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 5;

/// Identifier for a record created through the form, e.g. `LD-1700000000000`
pub fn record_id<Tz: TimeZone>(prefix: &str, now: &DateTime<Tz>) -> String {
    format!("{}-{}", prefix, now.timestamp_millis())
}

/// Identifier for an imported record, e.g. `LD-IMP-1700000000000-k3x9q`
pub fn import_id<Tz: TimeZone, R: Rng + ?Sized>(prefix: &str, now: &DateTime<Tz>, rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{}-IMP-{}-{}", prefix, now.timestamp_millis(), suffix)
}
