use anyhow::Context as _;
use chrono::NaiveDate;
use hxbit_core::ValidationError;
use uuid::Uuid;

use crate::{
    database::Database,
    impls::{clean_optional, now_i64},
    model::competition::Competition,
};

pub struct NewCompetition<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub organizer: Option<&'a str>,
    pub held_on: Option<NaiveDate>,
}

#[derive(sqlx::FromRow)]
struct CompetitionRow {
    id: i64,
    user_id: Uuid,
    name: String,
    organizer: Option<String>,
    held_on: Option<NaiveDate>,
    placement: Option<String>,
    created_at: i64,
}

pub async fn add_competition(
    db: &Database,
    new: NewCompetition<'_>,
) -> anyhow::Result<Competition> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingField("Competition name").into());
    }
    let now = now_i64()?;

    let row: CompetitionRow = sqlx::query_as(
        "INSERT INTO competitions (user_id, name, organizer, held_on, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, user_id, name, organizer, held_on, placement, created_at",
    )
    .bind(new.user_id)
    .bind(name)
    .bind(clean_optional(new.organizer))
    .bind(new.held_on)
    .bind(now)
    .fetch_one(db.pool())
    .await?;

    to_competition(row)
}

/// Competitions ordered by date, most recent first; undated entries last.
pub async fn list_competitions(db: &Database, user_id: Uuid) -> anyhow::Result<Vec<Competition>> {
    let rows: Vec<CompetitionRow> = sqlx::query_as(
        "SELECT id, user_id, name, organizer, held_on, placement, created_at
         FROM competitions
         WHERE user_id = $1
         ORDER BY held_on DESC NULLS LAST, created_at DESC",
    )
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_competition).collect()
}

pub async fn record_placement(
    db: &Database,
    user_id: Uuid,
    competition_id: u64,
    placement: &str,
) -> anyhow::Result<bool> {
    let competition_id_i64 =
        i64::try_from(competition_id).context("competition_id out of i64 range")?;

    let updated = sqlx::query("UPDATE competitions SET placement = $1 WHERE id = $2 AND user_id = $3")
        .bind(clean_optional(Some(placement)))
        .bind(competition_id_i64)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(updated > 0)
}

pub async fn delete_competition(
    db: &Database,
    user_id: Uuid,
    competition_id: u64,
) -> anyhow::Result<bool> {
    let competition_id_i64 =
        i64::try_from(competition_id).context("competition_id out of i64 range")?;

    let deleted = sqlx::query("DELETE FROM competitions WHERE id = $1 AND user_id = $2")
        .bind(competition_id_i64)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

fn to_competition(row: CompetitionRow) -> anyhow::Result<Competition> {
    Ok(Competition {
        id: u64::try_from(row.id).context("id row out of u64 range")?,
        user_id: row.user_id,
        name: row.name,
        organizer: row.organizer,
        held_on: row.held_on,
        placement: row.placement,
        created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
    })
}
