//! ID, time and truncation formatters for CLI output.

use chrono::{DateTime, Utc};

/// Return first 8 chars of a UUID string for list display.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Compact local-agnostic timestamp, e.g. "2026-03-14 17:45".
pub fn short_time(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Format an optional timestamp, or "never".
pub fn short_time_opt(dt: Option<&DateTime<Utc>>) -> String {
    dt.map_or_else(|| "never".to_string(), short_time)
}

/// Truncate a string to `max_len` characters, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
