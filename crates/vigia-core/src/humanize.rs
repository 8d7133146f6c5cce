// ── Human-readable timestamp rendering ──
//
// Shared by the CLI detail views and the TUI status cards.

use chrono::{DateTime, Utc};

/// Compact relative-time string: "just now", "42s ago", "5m ago",
/// "3h ago", or the plain date once more than a day has passed.
///
/// A timestamp slightly in the future (server clock ahead of ours)
/// renders as "just now".
pub fn time_ago(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(ts).num_seconds();
    if secs < 10 {
        "just now".into()
    } else if secs < 60 {
        format!("{secs}s ago")
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        ts.format("%Y-%m-%d").to_string()
    }
}

/// Like [`time_ago`], rendering a missing timestamp as "never".
pub fn time_ago_opt(ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    ts.map_or_else(|| "never".into(), |ts| time_ago(ts, now))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 26, 12, 0, 0).unwrap()
    }

    #[test]
    fn fresh_timestamps_are_just_now() {
        assert_eq!(time_ago(now(), now()), "just now");
        assert_eq!(time_ago(now() - chrono::Duration::seconds(9), now()), "just now");
    }

    #[test]
    fn future_timestamp_is_just_now() {
        assert_eq!(time_ago(now() + chrono::Duration::seconds(30), now()), "just now");
    }

    #[test]
    fn scales_through_seconds_minutes_hours() {
        assert_eq!(time_ago(now() - chrono::Duration::seconds(42), now()), "42s ago");
        assert_eq!(time_ago(now() - chrono::Duration::minutes(5), now()), "5m ago");
        assert_eq!(time_ago(now() - chrono::Duration::hours(3), now()), "3h ago");
    }

    #[test]
    fn old_timestamps_fall_back_to_the_date() {
        let ts = now() - chrono::Duration::days(2);
        assert_eq!(time_ago(ts, now()), "2025-08-24");
    }

    #[test]
    fn missing_timestamp_is_never() {
        assert_eq!(time_ago_opt(None, now()), "never");
        assert_eq!(
            time_ago_opt(Some(now() - chrono::Duration::minutes(2)), now()),
            "2m ago"
        );
    }
}
