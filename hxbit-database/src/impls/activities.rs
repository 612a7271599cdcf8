use anyhow::Context as _;
use hxbit_core::ValidationError;
use uuid::Uuid;

use crate::{
    database::Database,
    impls::{clean_optional, now_i64},
    model::activity::Activity,
};

pub struct NewActivity<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
}

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: i64,
    user_id: Uuid,
    name: String,
    description: Option<String>,
    category: Option<String>,
    level: i32,
    xp: i64,
    created_at: i64,
}

pub async fn create_activity(db: &Database, new: NewActivity<'_>) -> anyhow::Result<Activity> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingField("Activity name").into());
    }
    let now = now_i64()?;

    let row: ActivityRow = sqlx::query_as(
        "INSERT INTO activities (user_id, name, description, category, level, xp, created_at)
         VALUES ($1, $2, $3, $4, 1, 0, $5)
         RETURNING id, user_id, name, description, category, level, xp, created_at",
    )
    .bind(new.user_id)
    .bind(name)
    .bind(clean_optional(new.description))
    .bind(clean_optional(new.category))
    .bind(now)
    .fetch_one(db.pool())
    .await?;

    to_activity(row)
}

/// List a user's activities, newest first.
pub async fn list_activities(db: &Database, user_id: Uuid) -> anyhow::Result<Vec<Activity>> {
    let rows: Vec<ActivityRow> = sqlx::query_as(
        "SELECT id, user_id, name, description, category, level, xp, created_at
         FROM activities
         WHERE user_id = $1
         ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_activity).collect()
}

pub async fn get_activity(
    db: &Database,
    user_id: Uuid,
    activity_id: u64,
) -> anyhow::Result<Option<Activity>> {
    let activity_id_i64 = i64::try_from(activity_id).context("activity_id out of i64 range")?;

    let row: Option<ActivityRow> = sqlx::query_as(
        "SELECT id, user_id, name, description, category, level, xp, created_at
         FROM activities
         WHERE id = $1 AND user_id = $2",
    )
    .bind(activity_id_i64)
    .bind(user_id)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_activity).transpose()
}

/// Delete an activity and, through the foreign key, its tasks. Earned XP stays on the account.
pub async fn delete_activity(db: &Database, user_id: Uuid, activity_id: u64) -> anyhow::Result<bool> {
    let activity_id_i64 = i64::try_from(activity_id).context("activity_id out of i64 range")?;

    let deleted = sqlx::query("DELETE FROM activities WHERE id = $1 AND user_id = $2")
        .bind(activity_id_i64)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

fn to_activity(row: ActivityRow) -> anyhow::Result<Activity> {
    Ok(Activity {
        id: u64::try_from(row.id).context("id row out of u64 range")?,
        user_id: row.user_id,
        name: row.name,
        description: row.description,
        category: row.category,
        level: row.level,
        xp: row.xp,
        created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
    })
}
