// src/utils/time.rs

use chrono::{DateTime, NaiveDateTime, NaiveTime};

/// Formats a backend timestamp as a wall-clock `HH:MM` label.
///
/// Accepts RFC 3339 (`2024-05-01T07:30:00.000000Z`), the plain
/// `YYYY-MM-DD HH:MM:SS` form and a bare `HH:MM[:SS]`. The clock shown is the
/// one in the string; no timezone conversion happens here.
/// Missing or unreadable values render as `-`.
pub fn clock_label(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "-".to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%H:%M").to_string();
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format("%H:%M").to_string();
        }
    }

    for fmt in ["%H:%M:%S", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(raw, fmt) {
            return t.format("%H:%M").to_string();
        }
    }

    "-".to_string()
}
