use anyhow::Context as _;
use hxbit_core::ValidationError;
use uuid::Uuid;

use crate::{
    database::Database,
    impls::{clean_optional, now_i64},
    model::schedule::ScheduleEvent,
};

pub struct NewScheduleEvent<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub location: Option<&'a str>,
    pub starts_at: u64,
    pub ends_at: u64,
}

#[derive(sqlx::FromRow)]
struct ScheduleEventRow {
    id: i64,
    user_id: Uuid,
    title: String,
    location: Option<String>,
    starts_at: i64,
    ends_at: i64,
    created_at: i64,
}

/// Reject events without a title or whose end precedes their start.
pub fn validate_event(new: &NewScheduleEvent<'_>) -> Result<(), ValidationError> {
    if new.title.trim().is_empty() {
        return Err(ValidationError::MissingField("Event title"));
    }
    if new.ends_at < new.starts_at {
        return Err(ValidationError::EventEndsBeforeStart);
    }
    Ok(())
}

pub async fn add_event(db: &Database, new: NewScheduleEvent<'_>) -> anyhow::Result<ScheduleEvent> {
    validate_event(&new)?;

    let starts_at = i64::try_from(new.starts_at).context("starts_at out of i64 range")?;
    let ends_at = i64::try_from(new.ends_at).context("ends_at out of i64 range")?;
    let now = now_i64()?;

    let row: ScheduleEventRow = sqlx::query_as(
        "INSERT INTO schedule_events (user_id, title, location, starts_at, ends_at, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, user_id, title, location, starts_at, ends_at, created_at",
    )
    .bind(new.user_id)
    .bind(new.title.trim())
    .bind(clean_optional(new.location))
    .bind(starts_at)
    .bind(ends_at)
    .bind(now)
    .fetch_one(db.pool())
    .await?;

    to_event(row)
}

/// Events that have not ended yet as of `now`, in start order.
pub async fn upcoming_events(
    db: &Database,
    user_id: Uuid,
    now: u64,
    limit: u32,
) -> anyhow::Result<Vec<ScheduleEvent>> {
    let now_secs = i64::try_from(now).context("now out of i64 range")?;
    let limit_i64 = i64::from(limit.clamp(1, 100));

    let rows: Vec<ScheduleEventRow> = sqlx::query_as(
        "SELECT id, user_id, title, location, starts_at, ends_at, created_at
         FROM schedule_events
         WHERE user_id = $1 AND ends_at >= $2
         ORDER BY starts_at ASC, id ASC
         LIMIT $3",
    )
    .bind(user_id)
    .bind(now_secs)
    .bind(limit_i64)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_event).collect()
}

pub async fn delete_event(db: &Database, user_id: Uuid, event_id: u64) -> anyhow::Result<bool> {
    let event_id_i64 = i64::try_from(event_id).context("event_id out of i64 range")?;

    let deleted = sqlx::query("DELETE FROM schedule_events WHERE id = $1 AND user_id = $2")
        .bind(event_id_i64)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

fn to_event(row: ScheduleEventRow) -> anyhow::Result<ScheduleEvent> {
    Ok(ScheduleEvent {
        id: u64::try_from(row.id).context("id row out of u64 range")?,
        user_id: row.user_id,
        title: row.title,
        location: row.location,
        starts_at: u64::try_from(row.starts_at).context("starts_at row out of u64 range")?,
        ends_at: u64::try_from(row.ends_at).context("ends_at row out of u64 range")?,
        created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
    })
}

#[cfg(test)]
mod tests {
    use hxbit_core::ValidationError;
    use uuid::Uuid;

    use super::{NewScheduleEvent, validate_event};

    fn event(title: &str, starts_at: u64, ends_at: u64) -> NewScheduleEvent<'_> {
        NewScheduleEvent {
            user_id: Uuid::nil(),
            title,
            location: None,
            starts_at,
            ends_at,
        }
    }

    #[test]
    fn events_must_not_end_before_they_start() {
        assert_eq!(validate_event(&event("Practice", 100, 200)), Ok(()));
        assert_eq!(validate_event(&event("Instant", 100, 100)), Ok(()));
        assert_eq!(
            validate_event(&event("Backwards", 200, 100)),
            Err(ValidationError::EventEndsBeforeStart)
        );
    }

    #[test]
    fn events_need_a_title() {
        assert_eq!(
            validate_event(&event("  ", 1, 2)),
            Err(ValidationError::MissingField("Event title"))
        );
    }
}
