use chrono::{Duration, NaiveDate, NaiveDateTime};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;

pub const MIN_XP_REWARD: i32 = 1;
pub const MAX_XP_REWARD: i32 = 1_000;

/// Accept only `[a-zA-Z0-9_]{3,20}`. No trimming happens here.
pub fn is_valid_username(raw: &str) -> bool {
    let len = raw.len();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return false;
    }

    raw.bytes()
        .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}

/// Parse an XP reward, rejecting values outside `MIN_XP_REWARD..=MAX_XP_REWARD`.
pub fn parse_xp_reward(raw: &str) -> Option<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|value| (MIN_XP_REWARD..=MAX_XP_REWARD).contains(value))
}

/// Parse a due date: `today`, `tomorrow`, `+N` (days from today) or `YYYY-MM-DD`.
pub fn parse_due_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    match value.to_ascii_lowercase().as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.checked_add_signed(Duration::days(1)),
        _ => {}
    }

    if let Some(offset) = value.strip_prefix('+') {
        let days = offset.parse::<u32>().ok()?;
        return today.checked_add_signed(Duration::days(i64::from(days)));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parse a UTC timestamp written as `YYYY-MM-DDTHH:MM` (or with a space) into unix seconds.
pub fn parse_datetime_unix(raw: &str) -> Option<i64> {
    let value = raw.trim();
    ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|parsed| parsed.and_utc().timestamp())
}

/// Parse a compact duration token like `30m`, `2h`, `1h30m`, `1d`, or plain seconds.
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let bytes = compact.as_bytes();
    let mut cursor = 0;
    let mut total_seconds = 0_u64;
    let mut saw_unit_segment = false;

    while cursor < bytes.len() {
        let number_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }

        if number_start == cursor {
            return None;
        }

        let number = compact[number_start..cursor].parse::<u64>().ok()?;
        let saw_unit = cursor < bytes.len();

        // A bare number is only allowed as the whole token.
        if !saw_unit && saw_unit_segment {
            return None;
        }

        let multiplier = if saw_unit {
            let unit = bytes[cursor].to_ascii_lowercase();
            cursor += 1;

            match unit {
                b's' => 1_u64,
                b'm' => 60,
                b'h' => 3_600,
                b'd' => 86_400,
                _ => return None,
            }
        } else {
            1
        };

        saw_unit_segment |= saw_unit;
        total_seconds = total_seconds.checked_add(number.checked_mul(multiplier)?)?;
    }

    (total_seconds > 0).then_some(total_seconds)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        is_valid_username, parse_datetime_unix, parse_due_date, parse_duration_seconds,
        parse_xp_reward,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn usernames_follow_the_allowed_pattern() {
        assert!(is_valid_username("abc"));
        assert!(is_valid_username("Player_One_2024"));
        assert!(is_valid_username("a_________________z"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("this_name_is_way_too_long"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("dash-name"));
        assert!(!is_valid_username(" abc"));
        assert!(!is_valid_username("ümlaut"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn xp_rewards_are_bounded() {
        assert_eq!(parse_xp_reward("50"), Some(50));
        assert_eq!(parse_xp_reward(" 1000 "), Some(1000));
        assert_eq!(parse_xp_reward("0"), None);
        assert_eq!(parse_xp_reward("1001"), None);
        assert_eq!(parse_xp_reward("-5"), None);
        assert_eq!(parse_xp_reward("lots"), None);
    }

    #[test]
    fn due_dates_accept_keywords_offsets_and_iso() {
        let today = date(2026, 10, 16);
        assert_eq!(parse_due_date("today", today), Some(today));
        assert_eq!(parse_due_date("Tomorrow", today), Some(date(2026, 10, 17)));
        assert_eq!(parse_due_date("+20", today), Some(date(2026, 11, 5)));
        assert_eq!(parse_due_date("2027-01-02", today), Some(date(2027, 1, 2)));
        assert_eq!(parse_due_date("+x", today), None);
        assert_eq!(parse_due_date("02/01/2027", today), None);
        assert_eq!(parse_due_date("", today), None);
    }

    #[test]
    fn datetimes_parse_as_utc() {
        assert_eq!(parse_datetime_unix("1970-01-01T00:01"), Some(60));
        assert_eq!(parse_datetime_unix("1970-01-02 00:00"), Some(86_400));
        assert_eq!(parse_datetime_unix("1970-01-02"), None);
    }

    #[test]
    fn compact_durations() {
        assert_eq!(parse_duration_seconds("90"), Some(90));
        assert_eq!(parse_duration_seconds("30m"), Some(1_800));
        assert_eq!(parse_duration_seconds("1h30m"), Some(5_400));
        assert_eq!(parse_duration_seconds("1D"), Some(86_400));
        assert_eq!(parse_duration_seconds("1h30"), None);
        assert_eq!(parse_duration_seconds("0m"), None);
        assert_eq!(parse_duration_seconds("5w"), None);
        assert_eq!(parse_duration_seconds(""), None);
    }
}
