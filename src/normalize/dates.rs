//! Canonical timestamp handling

use chrono::DateTime;

/// Epoch values at or above this magnitude are unix milliseconds.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Strict RFC 3339 parse to epoch seconds. Unparseable input yields `None`;
/// callers drop the entry instead of failing the batch.
pub(super) fn parse_rfc3339(text: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|parsed| parsed.timestamp())
}

/// Normalize an integer epoch to seconds, scaling millisecond values down.
pub(super) fn scale_epoch(epoch: i64) -> i64 {
    if epoch.abs() >= MILLIS_THRESHOLD {
        epoch / 1000
    } else {
        epoch
    }
}
