use anyhow::Context as _;
use hxbit_core::ValidationError;
use hxbit_utils::parse::is_valid_username;
use tracing::info;
use uuid::Uuid;

use crate::{
    database::Database,
    impls::{clean_optional, is_unique_violation, now_i64},
    model::account::Account,
};

#[derive(sqlx::FromRow)]
struct AccountRow {
    user_id: Uuid,
    username: String,
    display_name: Option<String>,
    bio: Option<String>,
    avatar_url: Option<String>,
    level: i32,
    total_xp: i64,
    created_at: i64,
}

const ACCOUNT_COLUMNS: &str =
    "user_id, username, display_name, bio, avatar_url, level, total_xp, created_at";

/// Validate the username shape, then check that no account already uses it.
///
/// Malformed names are rejected before any query is issued.
pub async fn ensure_username_available(db: &Database, username: &str) -> anyhow::Result<()> {
    if !is_valid_username(username) {
        return Err(ValidationError::InvalidUsername.into());
    }

    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM accounts WHERE LOWER(username) = LOWER($1))",
    )
    .bind(username)
    .fetch_one(db.pool())
    .await?;

    if taken {
        return Err(ValidationError::UsernameTaken.into());
    }

    Ok(())
}

/// Create the account row and its stat block for a freshly registered auth user.
pub async fn create_account(
    db: &Database,
    user_id: Uuid,
    username: &str,
    display_name: Option<&str>,
) -> anyhow::Result<Account> {
    let now = now_i64()?;
    let mut tx = db.pool().begin().await?;

    let inserted = sqlx::query_as::<_, AccountRow>(&format!(
        "INSERT INTO accounts (user_id, username, display_name, level, total_xp, created_at)
         VALUES ($1, $2, $3, 1, 0, $4)
         RETURNING {ACCOUNT_COLUMNS}"
    ))
    .bind(user_id)
    .bind(username)
    .bind(clean_optional(display_name))
    .bind(now)
    .fetch_one(&mut *tx)
    .await;

    let row = match inserted {
        Ok(row) => row,
        Err(err) if is_unique_violation(&err) => {
            tx.rollback().await?;
            return Err(ValidationError::UsernameTaken.into());
        }
        Err(err) => return Err(err.into()),
    };

    sqlx::query("INSERT INTO stats (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!(%user_id, username, "account created");

    to_account(row)
}

pub async fn get_account(db: &Database, user_id: Uuid) -> anyhow::Result<Option<Account>> {
    let row: Option<AccountRow> = sqlx::query_as(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_account).transpose()
}

pub async fn find_account_by_username(
    db: &Database,
    username: &str,
) -> anyhow::Result<Option<Account>> {
    let row: Option<AccountRow> = sqlx::query_as(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE LOWER(username) = LOWER($1)"
    ))
    .bind(username.trim())
    .fetch_optional(db.pool())
    .await?;

    row.map(to_account).transpose()
}

/// Update display name and/or bio. `None` leaves a field untouched; blank text clears it.
pub async fn update_profile(
    db: &Database,
    user_id: Uuid,
    display_name: Option<&str>,
    bio: Option<&str>,
) -> anyhow::Result<bool> {
    let updated = sqlx::query(
        "UPDATE accounts
         SET display_name = CASE WHEN $1 THEN $2 ELSE display_name END,
             bio = CASE WHEN $3 THEN $4 ELSE bio END
         WHERE user_id = $5",
    )
    .bind(display_name.is_some())
    .bind(clean_optional(display_name))
    .bind(bio.is_some())
    .bind(clean_optional(bio))
    .bind(user_id)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(updated > 0)
}

pub async fn set_avatar_url(db: &Database, user_id: Uuid, avatar_url: &str) -> anyhow::Result<bool> {
    let updated = sqlx::query("UPDATE accounts SET avatar_url = $1 WHERE user_id = $2")
        .bind(avatar_url)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(updated > 0)
}

fn to_account(row: AccountRow) -> anyhow::Result<Account> {
    Ok(Account {
        user_id: row.user_id,
        username: row.username,
        display_name: row.display_name,
        bio: row.bio,
        avatar_url: row.avatar_url,
        level: row.level,
        total_xp: row.total_xp,
        created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
    })
}

#[cfg(test)]
mod tests {
    use hxbit_core::ValidationError;

    use super::ensure_username_available;
    use crate::database::Database;

    #[tokio::test]
    async fn malformed_usernames_fail_before_any_query() {
        // Nothing listens on this address; reaching the database would error differently.
        let db = Database::connect_lazy("postgres://hxbit@127.0.0.1:1/unreachable").unwrap();

        for bad in ["ab", "with space", "way_too_long_username_x", "dash-name", ""] {
            let err = ensure_username_available(&db, bad).await.unwrap_err();
            assert_eq!(
                err.downcast_ref::<ValidationError>(),
                Some(&ValidationError::InvalidUsername),
                "{bad}"
            );
        }
    }
}
