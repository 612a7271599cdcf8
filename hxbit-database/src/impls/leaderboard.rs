use uuid::Uuid;

use crate::{cache::leaderboard_key, database::Database, model::account::LeaderboardEntry};

/// Number of accounts kept in the cached leaderboard.
pub const LEADERBOARD_SIZE: usize = 100;

#[derive(sqlx::FromRow)]
struct LeaderboardRow {
    user_id: Uuid,
    username: String,
    level: i32,
    total_xp: i64,
}

/// Top accounts by total XP, served from cache when available.
pub async fn top_accounts(db: &Database) -> anyhow::Result<Vec<LeaderboardEntry>> {
    let cache = db.cache();
    let key = leaderboard_key(cache);

    cache
        .get_or_load_json(&key, cache.leaderboard_ttl(), || async {
            let rows: Vec<LeaderboardRow> = sqlx::query_as(
                "SELECT user_id, username, level, total_xp
                 FROM accounts
                 ORDER BY total_xp DESC, LOWER(username) ASC
                 LIMIT $1",
            )
            .bind(LEADERBOARD_SIZE as i64)
            .fetch_all(db.pool())
            .await?;

            Ok(rank_accounts(
                rows.into_iter()
                    .map(|row| (row.user_id, row.username, row.level, row.total_xp))
                    .collect(),
            ))
        })
        .await
}

/// 1-based position of `user_id` across all accounts, or `None` if no account exists.
pub async fn rank_of(db: &Database, user_id: Uuid) -> anyhow::Result<Option<u64>> {
    let rank: Option<i64> = sqlx::query_scalar(
        "SELECT 1 + (
            SELECT COUNT(*) FROM accounts other
            WHERE other.total_xp > me.total_xp
               OR (other.total_xp = me.total_xp AND LOWER(other.username) < LOWER(me.username))
         )
         FROM accounts me
         WHERE me.user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(db.pool())
    .await?;

    Ok(rank.and_then(|value| u64::try_from(value).ok()))
}

/// Order by XP descending, ties by case-insensitive username, and number from 1.
pub fn rank_accounts(mut rows: Vec<(Uuid, String, i32, i64)>) -> Vec<LeaderboardEntry> {
    rows.sort_by(|a, b| {
        b.3.cmp(&a.3)
            .then_with(|| a.1.to_ascii_lowercase().cmp(&b.1.to_ascii_lowercase()))
    });

    rows.into_iter()
        .enumerate()
        .map(|(idx, (user_id, username, level, total_xp))| LeaderboardEntry {
            rank: idx + 1,
            user_id,
            username,
            level,
            total_xp,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::rank_accounts;

    #[test]
    fn ranks_by_xp_then_username() {
        let ranked = rank_accounts(vec![
            (Uuid::new_v4(), "zed".to_owned(), 2, 700),
            (Uuid::new_v4(), "Bob".to_owned(), 3, 1_200),
            (Uuid::new_v4(), "amy".to_owned(), 2, 700),
            (Uuid::new_v4(), "cat".to_owned(), 1, 0),
        ]);

        let order: Vec<(usize, &str)> = ranked
            .iter()
            .map(|entry| (entry.rank, entry.username.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "Bob"), (2, "amy"), (3, "zed"), (4, "cat")]);
    }

    #[test]
    fn empty_leaderboard() {
        assert!(rank_accounts(Vec::new()).is_empty());
    }
}
