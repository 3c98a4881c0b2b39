//! Relative timestamps for the activity feed.

/// Timestamps below this are taken to be in seconds, above in milliseconds.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

/// Normalize a seconds-or-milliseconds timestamp to milliseconds.
pub fn to_millis(timestamp: i64) -> i64 {
    if timestamp < MILLIS_THRESHOLD {
        timestamp.saturating_mul(1000)
    } else {
        timestamp
    }
}

/// Render `timestamp` relative to `now_ms`: `just now`, `5m ago`, `3h ago`,
/// `2d ago`. Future timestamps render as `just now`.
pub fn format_relative(timestamp: i64, now_ms: i64) -> String {
    let diff_ms = now_ms - to_millis(timestamp);
    if diff_ms < 0 {
        return "just now".to_owned();
    }
    let minutes = diff_ms / 60_000;
    let hours = minutes / 60;
    let days = hours / 24;

    match () {
        _ if minutes < 1 => "just now".to_owned(),
        _ if minutes < 60 => format!("{minutes}m ago"),
        _ if hours < 24 => format!("{hours}h ago"),
        _ => format!("{days}d ago"),
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    let now = time::OffsetDateTime::now_utc();
    (now.unix_timestamp_nanos() / 1_000_000) as i64
}
