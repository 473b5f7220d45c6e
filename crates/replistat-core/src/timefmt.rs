//! Timestamp formatting for counter fields.

use chrono::{DateTime, Utc};

/// Placeholder rendered for unset timestamps.
pub const UNSET: &str = "-";

/// Formats a microsecond Unix timestamp as `YYYY-MM-DD HH:MM:SS.ffffff`.
///
/// Timestamps are rendered in UTC so two hosts looking at the same
/// deployment agree on the output. A value of zero (or anything
/// non-positive, or out of chrono's range) means "never" and renders as
/// [`UNSET`].
pub fn format_micros(micros: i64) -> String {
    if micros <= 0 {
        return UNSET.to_string();
    }
    match DateTime::<Utc>::from_timestamp_micros(micros) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        None => UNSET.to_string(),
    }
}
