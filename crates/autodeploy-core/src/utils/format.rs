use chrono::{DateTime, NaiveDateTime};

/// Display format for timestamps in log and deployment listings
const TIMESTAMP_FORMAT: &str = "%b %d, %Y %H:%M";

/// Truncate a string to a maximum number of bytes, adding a note with the
/// original length. Cuts on a char boundary.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &s[..end], s.len())
}

/// Case-insensitive substring match. An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Format a backend timestamp for display.
/// Accepts RFC 3339 and zone-less ISO 8601; anything else is returned as-is.
pub fn format_timestamp(ts: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        dt.format(TIMESTAMP_FORMAT).to_string()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        dt.format(TIMESTAMP_FORMAT).to_string()
    } else {
        ts.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(
            truncate_string("Hello World", 5),
            "Hello... (truncated, 11 total bytes)"
        );
        // Never splits a multi-byte character
        assert_eq!(truncate_string("héllo", 2), "h... (truncated, 6 total bytes)");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Build FAILED at step 3", "failed"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("deploy ok", "error"));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2024-03-01T10:00:00Z"), "Mar 01, 2024 10:00");
        assert_eq!(format_timestamp("2024-03-01T10:00:00.123456"), "Mar 01, 2024 10:00");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp(""), "");
    }
}
