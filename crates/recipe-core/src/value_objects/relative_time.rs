//! Human readable "time ago" strings for comment listings

use chrono::{DateTime, Utc};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Render the elapsed time between `created_at` and `now`.
///
/// Elapsed time is truncated to whole minutes. Timestamps in the future
/// render as "just now".
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - created_at).num_minutes();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < MINUTES_PER_HOUR {
        ago(minutes, "minute")
    } else if minutes < MINUTES_PER_DAY {
        ago(minutes / MINUTES_PER_HOUR, "hour")
    } else {
        ago(minutes / MINUTES_PER_DAY, "day")
    }
}

fn ago(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}
