//! Deterministic, content-addressed issue id generation.
//!
//! An id is `<prefix>-<suffix>` where the suffix is a prefix of
//! `SHA-256("prefix:timestamp:title:host")` in lowercase hex. The suffix
//! starts at [`DEFAULT_SUFFIX_LEN`] characters and grows one character at a
//! time until it no longer collides with a live id.

use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Initial hex-suffix length for generated issue ids.
pub const DEFAULT_SUFFIX_LEN: usize = 3;

/// Current UTC time in RFC 3339, carrying nanoseconds when present.
#[must_use]
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// A stable host identifier to salt id generation across machines.
#[must_use]
pub fn host_label() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Full SHA-256 hex digest of the id input tuple.
#[must_use]
pub fn issue_id_hash(prefix: &str, title: &str, timestamp: &str, host: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{prefix}:{timestamp}:{title}:{host}"));
    let digest = hasher.finalize();
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Form an id from the first `len` characters of a hash.
#[must_use]
pub fn issue_id_from_hash(prefix: &str, hash: &str, len: usize) -> String {
    let len = len.min(hash.len());
    format!("{prefix}-{}", &hash[..len])
}

/// Derive an id at the default suffix length, ignoring collisions.
#[must_use]
pub fn generate_issue_id(prefix: &str, title: &str, timestamp: &str, host: &str) -> String {
    let hash = issue_id_hash(prefix, title, timestamp, host);
    issue_id_from_hash(prefix, &hash, DEFAULT_SUFFIX_LEN)
}

/// Derive the shortest non-colliding id for the input tuple.
///
/// `exists` is consulted for each candidate, shortest first, so the result
/// always has the minimal suffix length at or above [`DEFAULT_SUFFIX_LEN`].
///
/// # Errors
///
/// Propagates errors from `exists`, and returns [`Error::IdSpaceExhausted`]
/// if every prefix of the hash is taken.
pub fn generate_unique_issue_id(
    prefix: &str,
    title: &str,
    timestamp: &str,
    host: &str,
    mut exists: impl FnMut(&str) -> Result<bool>,
) -> Result<String> {
    let hash = issue_id_hash(prefix, title, timestamp, host);
    for len in DEFAULT_SUFFIX_LEN..=hash.len() {
        let candidate = issue_id_from_hash(prefix, &hash, len);
        if !exists(&candidate)? {
            return Ok(candidate);
        }
    }
    Err(Error::IdSpaceExhausted {
        prefix: prefix.to_string(),
    })
}
