pub mod accounts;
pub mod activities;
pub mod competitions;
pub mod internships;
pub mod leaderboard;
pub mod schedule;
pub mod social;
pub mod stats;
pub mod tasks;

use anyhow::Context as _;
use hxbit_utils::time::now_unix_secs;

pub(crate) fn now_i64() -> anyhow::Result<i64> {
    i64::try_from(now_unix_secs()).context("now out of i64 range")
}

/// True when the error is a unique-constraint violation reported by Postgres.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Trim and drop empty optional text.
pub(crate) fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::clean_optional;

    #[test]
    fn optional_text_is_trimmed_or_dropped() {
        assert_eq!(clean_optional(Some("  hi ")), Some("hi".to_owned()));
        assert_eq!(clean_optional(Some("   ")), None);
        assert_eq!(clean_optional(None), None);
    }
}
