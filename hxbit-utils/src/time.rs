use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{NaiveDate, Utc};

/// Return the current unix timestamp in seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Describe a due date relative to `today` ("Due today", "Due in 3 days", "Overdue by 1 day").
pub fn format_due(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "Due today".to_owned(),
        1 => "Due tomorrow".to_owned(),
        d if d > 1 => format!("Due in {d} days"),
        -1 => "Overdue by 1 day".to_owned(),
        d => format!("Overdue by {} days", -d),
    }
}

/// Describe how long ago `then` happened, relative to `now` (both unix seconds).
pub fn format_relative_age(then: u64, now: u64) -> String {
    let elapsed = now.saturating_sub(then);

    match elapsed {
        0..60 => "just now".to_owned(),
        60..3_600 => format!("{}m ago", elapsed / 60),
        3_600..86_400 => format!("{}h ago", elapsed / 3_600),
        86_400..2_592_000 => format!("{}d ago", elapsed / 86_400),
        _ => format!("{}mo ago", elapsed / 2_592_000),
    }
}

/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1h, 1d, 1h 30m).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        return if hours > 0 {
            format!("{days}d {hours}h")
        } else {
            format!("{days}d")
        };
    }

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{format_compact_duration, format_due, format_relative_age};

    #[test]
    fn due_dates_read_naturally() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let shift = |days: i64| today + chrono::Duration::days(days);

        assert_eq!(format_due(today, today), "Due today");
        assert_eq!(format_due(shift(1), today), "Due tomorrow");
        assert_eq!(format_due(shift(3), today), "Due in 3 days");
        assert_eq!(format_due(shift(-1), today), "Overdue by 1 day");
        assert_eq!(format_due(shift(-4), today), "Overdue by 4 days");
    }

    #[test]
    fn relative_ages() {
        assert_eq!(format_relative_age(1_000, 1_030), "just now");
        assert_eq!(format_relative_age(0, 300), "5m ago");
        assert_eq!(format_relative_age(0, 7_200), "2h ago");
        assert_eq!(format_relative_age(0, 86_400 * 3), "3d ago");
        assert_eq!(format_relative_age(0, 2_592_000 * 2), "2mo ago");
        assert_eq!(format_relative_age(500, 100), "just now");
    }

    #[test]
    fn compact_duration_formatting() {
        assert_eq!(format_compact_duration(0), "0s");
        assert_eq!(format_compact_duration(59), "59s");
        assert_eq!(format_compact_duration(60), "1m");
        assert_eq!(format_compact_duration(61), "1m 1s");
        assert_eq!(format_compact_duration(3600), "1h");
        assert_eq!(format_compact_duration(3660), "1h 1m");
        assert_eq!(format_compact_duration(3605), "1h 5s");
        assert_eq!(format_compact_duration(90000), "1d 1h");
    }
}
