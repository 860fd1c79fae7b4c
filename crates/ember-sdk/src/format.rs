use chrono::{DateTime, Datelike};

use ember_types::TimestampMs;

/// Human-readable age of a post, relative to `now`.
///
/// Recent posts read as relative time; older ones as a short date, with the
/// year only when it differs from the current one.
pub fn format_age(created_at: TimestampMs, now: TimestampMs) -> String {
    let diff_ms = created_at.millis_until(now);
    let minutes = diff_ms / 60_000;
    if minutes < 60 {
        return format!("{minutes} minutes ago");
    }
    let hours = diff_ms / 3_600_000;
    if hours < 24 {
        return format!("{hours} hours ago");
    }
    let days = diff_ms / 86_400_000;
    if days < 7 {
        return format!("{days} days ago");
    }

    let (Some(created), Some(current)) = (
        DateTime::from_timestamp_millis(created_at.as_millis() as i64),
        DateTime::from_timestamp_millis(now.as_millis() as i64),
    ) else {
        return format!("{days} days ago");
    };
    if created.year() == current.year() {
        created.format("%b %-d").to_string()
    } else {
        created.format("%b %-d, %Y").to_string()
    }
}
