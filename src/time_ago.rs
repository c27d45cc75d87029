// src/time_ago.rs
//! Coarse relative timestamps ("3 hours ago") for article bylines.

use chrono::{DateTime, Utc};

/// Seconds under a minute, then minutes, hours, days. Future timestamps
/// read as "0 seconds ago".
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(then).num_seconds().max(0);
    match secs {
        s if s < 60 => format!("{s} seconds ago"),
        s if s < 3_600 => format!("{} minutes ago", s / 60),
        s if s < 86_400 => format!("{} hours ago", s / 3_600),
        s => format!("{} days ago", s / 86_400),
    }
}

/// Parse an RFC 3339 `publishedAt` and format it relative to `now`.
pub fn published_ago(published_at: &str, now: DateTime<Utc>) -> Option<String> {
    DateTime::parse_from_rfc3339(published_at)
        .ok()
        .map(|dt| format_time_ago(dt.with_timezone(&Utc), now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn buckets() {
        let n = now();
        assert_eq!(format_time_ago(n - Duration::seconds(42), n), "42 seconds ago");
        assert_eq!(format_time_ago(n - Duration::seconds(150), n), "2 minutes ago");
        assert_eq!(format_time_ago(n - Duration::hours(5), n), "5 hours ago");
        assert_eq!(format_time_ago(n - Duration::days(3), n), "3 days ago");
    }

    #[test]
    fn future_is_clamped() {
        let n = now();
        assert_eq!(format_time_ago(n + Duration::hours(1), n), "0 seconds ago");
    }

    #[test]
    fn parses_rfc3339() {
        assert_eq!(
            published_ago("2024-05-01T09:00:00Z", now()).as_deref(),
            Some("3 hours ago")
        );
        assert_eq!(published_ago("yesterday", now()), None);
    }
}
