use anyhow::Context as _;
use chrono::NaiveDate;
use hxbit_core::ValidationError;
use tracing::warn;
use uuid::Uuid;

use crate::{
    database::Database,
    impls::now_i64,
    model::internship::{Internship, InternshipStatus},
};

pub struct NewInternship<'a> {
    pub user_id: Uuid,
    pub company: &'a str,
    pub role: &'a str,
    pub status: InternshipStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(sqlx::FromRow)]
struct InternshipRow {
    id: i64,
    user_id: Uuid,
    company: String,
    role: String,
    status: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    created_at: i64,
    updated_at: i64,
}

pub async fn add_internship(db: &Database, new: NewInternship<'_>) -> anyhow::Result<Internship> {
    let company = new.company.trim();
    let role = new.role.trim();
    if company.is_empty() {
        return Err(ValidationError::MissingField("Company").into());
    }
    if role.is_empty() {
        return Err(ValidationError::MissingField("Role").into());
    }
    let now = now_i64()?;

    let row: InternshipRow = sqlx::query_as(
        "INSERT INTO internships (user_id, company, role, status, start_date, end_date, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
         RETURNING id, user_id, company, role, status, start_date, end_date, created_at, updated_at",
    )
    .bind(new.user_id)
    .bind(company)
    .bind(role)
    .bind(new.status.as_str())
    .bind(new.start_date)
    .bind(new.end_date)
    .bind(now)
    .fetch_one(db.pool())
    .await?;

    to_internship(row)
}

/// Open applications first, then most recently updated.
pub async fn list_internships(db: &Database, user_id: Uuid) -> anyhow::Result<Vec<Internship>> {
    let rows: Vec<InternshipRow> = sqlx::query_as(
        "SELECT id, user_id, company, role, status, start_date, end_date, created_at, updated_at
         FROM internships
         WHERE user_id = $1
         ORDER BY updated_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    let mut internships = rows
        .into_iter()
        .map(to_internship)
        .collect::<anyhow::Result<Vec<_>>>()?;
    internships.sort_by_key(|internship| internship.status.is_closed());
    Ok(internships)
}

pub async fn update_internship_status(
    db: &Database,
    user_id: Uuid,
    internship_id: u64,
    status: InternshipStatus,
) -> anyhow::Result<bool> {
    let internship_id_i64 =
        i64::try_from(internship_id).context("internship_id out of i64 range")?;
    let now = now_i64()?;

    let updated = sqlx::query(
        "UPDATE internships SET status = $1, updated_at = $2 WHERE id = $3 AND user_id = $4",
    )
    .bind(status.as_str())
    .bind(now)
    .bind(internship_id_i64)
    .bind(user_id)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(updated > 0)
}

pub async fn delete_internship(
    db: &Database,
    user_id: Uuid,
    internship_id: u64,
) -> anyhow::Result<bool> {
    let internship_id_i64 =
        i64::try_from(internship_id).context("internship_id out of i64 range")?;

    let deleted = sqlx::query("DELETE FROM internships WHERE id = $1 AND user_id = $2")
        .bind(internship_id_i64)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

fn to_internship(row: InternshipRow) -> anyhow::Result<Internship> {
    let status = row.status.parse::<InternshipStatus>().unwrap_or_else(|_| {
        warn!(internship_id = row.id, status = %row.status, "unknown internship status; treating as applied");
        InternshipStatus::Applied
    });

    Ok(Internship {
        id: u64::try_from(row.id).context("id row out of u64 range")?,
        user_id: row.user_id,
        company: row.company,
        role: row.role,
        status,
        start_date: row.start_date,
        end_date: row.end_date,
        created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
        updated_at: u64::try_from(row.updated_at).context("updated_at row out of u64 range")?,
    })
}
