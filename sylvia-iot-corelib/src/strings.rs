//! String libraries.
//!
//! Generators return opaque strings. IDs are short and readable, tokens are long hex strings
//! hashed from a random ID.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

/// Random part length of [`short_id`].
pub const SHORT_ID_LEN: usize = 8;
/// Random part length of the ID hashed by [`long_token`].
pub const LONG_TOKEN_LEN: usize = 32;

/// To generate a short entity ID in `[timestamp-milliseconds]-[random-alphanumeric]` format.
pub fn short_id(time: &DateTime<Utc>) -> String {
    format!("{}-{}", time.timestamp_millis(), randomstring(SHORT_ID_LEN))
}

/// To generate a long bearer token (64 hex characters).
pub fn long_token(time: &DateTime<Utc>) -> String {
    let seed = format!(
        "{}-{}",
        time.timestamp_nanos_opt().unwrap_or_default(),
        randomstring(LONG_TOKEN_LEN)
    );
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hex::encode(hasher.finalize())
}

/// To generate random alphanumeric string with the specified length.
pub fn randomstring(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// To convert time to ISO8601 format with milliseconds precision (`YYYY-MM-DDThh:mm:ss.SSSZ`).
pub fn time_str(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
