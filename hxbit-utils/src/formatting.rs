/// Group digits with commas (e.g. 1250 -> "1,250", -3000 -> "-3,000").
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        out.push('-');
    }

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Render XP progress inside the current level, e.g. "40/100 XP".
pub fn format_xp_progress(into_level: i64, level_span: i64) -> String {
    format!(
        "{}/{} XP",
        format_thousands(into_level),
        format_thousands(level_span)
    )
}

/// Fixed-width text progress bar, e.g. `[####------]` for 40% at width 10.
pub fn progress_bar(percent: u8, width: usize) -> String {
    let percent = usize::from(percent.min(100));
    let filled = (percent * width) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn format_leaderboard_line(rank: usize, username: &str, level: i32, total_xp: i64) -> String {
    format!(
        "#{rank} {username} · Lv {level} · {} XP",
        format_thousands(total_xp)
    )
}

pub fn pluralize<'a>(count: i64, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

#[cfg(test)]
mod tests {
    use super::{
        format_leaderboard_line, format_thousands, format_xp_progress, pluralize, progress_bar,
    };

    #[test]
    fn groups_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_250), "1,250");
        assert_eq!(format_thousands(1_000_000), "1,000,000");
        assert_eq!(format_thousands(-3_000), "-3,000");
    }

    #[test]
    fn xp_progress_and_bars() {
        assert_eq!(format_xp_progress(40, 100), "40/100 XP");
        assert_eq!(format_xp_progress(10, 500), "10/500 XP");
        assert_eq!(progress_bar(40, 10), "[####------]");
        assert_eq!(progress_bar(0, 4), "[----]");
        assert_eq!(progress_bar(250, 4), "[####]");
    }

    #[test]
    fn leaderboard_lines() {
        assert_eq!(
            format_leaderboard_line(1, "alice", 3, 1_250),
            "#1 alice · Lv 3 · 1,250 XP"
        );
    }

    #[test]
    fn plural_forms() {
        assert_eq!(pluralize(1, "point", "points"), "point");
        assert_eq!(pluralize(2, "point", "points"), "points");
        assert_eq!(pluralize(0, "point", "points"), "points");
    }
}
