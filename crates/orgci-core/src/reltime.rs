//! Human-readable age of a timestamp ("3h ago").

use chrono::{DateTime, Utc};

const YEAR: i64 = 31_536_000;
const MONTH: i64 = 2_592_000;
const DAY: i64 = 86_400;
const HOUR: i64 = 3_600;
const MINUTE: i64 = 60;

/// Largest unit first; the first threshold not exceeding the age wins.
const UNITS: &[(i64, &str)] = &[
    (YEAR, "y"),
    (MONTH, "mo"),
    (DAY, "d"),
    (HOUR, "h"),
    (MINUTE, "m"),
];

/// Format the age of `timestamp` relative to `now`.
///
/// Timestamps after `now` count as zero seconds old.
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - timestamp).num_seconds().max(0);
    for (unit, suffix) in UNITS {
        if elapsed >= *unit {
            return format!("{}{suffix} ago", elapsed / unit);
        }
    }
    format!("{elapsed}s ago")
}

/// [`format_relative`] against the current wall clock.
pub fn time_ago(timestamp: DateTime<Utc>) -> String {
    format_relative(timestamp, Utc::now())
}
