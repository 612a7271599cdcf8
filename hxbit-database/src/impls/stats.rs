use hxbit_core::{Stat, StatBlock};
use sqlx::PgConnection;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::Database;

const STAT_COLUMNS: &str = "stat_points, strength, intelligence, creativity, charisma, discipline, \
     leadership, endurance, focus, wisdom, resilience, communication, teamwork";

#[derive(sqlx::FromRow)]
struct StatsRow {
    stat_points: i32,
    strength: i32,
    intelligence: i32,
    creativity: i32,
    charisma: i32,
    discipline: i32,
    leadership: i32,
    endurance: i32,
    focus: i32,
    wisdom: i32,
    resilience: i32,
    communication: i32,
    teamwork: i32,
}

impl From<StatsRow> for StatBlock {
    fn from(row: StatsRow) -> Self {
        // Same order as `Stat::ALL`.
        StatBlock::new(
            row.stat_points,
            [
                row.strength,
                row.intelligence,
                row.creativity,
                row.charisma,
                row.discipline,
                row.leadership,
                row.endurance,
                row.focus,
                row.wisdom,
                row.resilience,
                row.communication,
                row.teamwork,
            ],
        )
    }
}

/// Result of spending a point on a stat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatUpgrade {
    Applied(StatBlock),
    /// Balance was zero or negative; nothing changed.
    NoPoints(StatBlock),
}

/// Fetch a user's stat block, creating the default block on first access.
pub async fn get_stats(db: &Database, user_id: Uuid) -> anyhow::Result<StatBlock> {
    sqlx::query("INSERT INTO stats (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(db.pool())
        .await?;

    let row: StatsRow = sqlx::query_as(&format!(
        "SELECT {STAT_COLUMNS} FROM stats WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_one(db.pool())
    .await?;

    Ok(row.into())
}

/// Award points inside an existing transaction, creating the stat block on first use.
pub(crate) async fn add_stat_points(
    conn: &mut PgConnection,
    user_id: Uuid,
    points: i32,
) -> anyhow::Result<i32> {
    let balance: i32 = sqlx::query_scalar(
        "INSERT INTO stats (user_id, stat_points) VALUES ($1, $2)
         ON CONFLICT (user_id) DO UPDATE SET stat_points = stats.stat_points + EXCLUDED.stat_points
         RETURNING stat_points",
    )
    .bind(user_id)
    .bind(points)
    .fetch_one(conn)
    .await?;

    Ok(balance)
}

/// Spend one point on `stat`. A non-positive balance makes this a no-op.
///
/// The block is locked for the duration so concurrent upgrades cannot spend
/// the same point twice.
pub async fn upgrade_stat(db: &Database, user_id: Uuid, stat: Stat) -> anyhow::Result<StatUpgrade> {
    let column = stat.column();
    let mut tx = db.pool().begin().await?;

    sqlx::query("INSERT INTO stats (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let row: StatsRow = sqlx::query_as(&format!(
        "SELECT {STAT_COLUMNS} FROM stats WHERE user_id = $1 FOR UPDATE"
    ))
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    let mut block = StatBlock::from(row);
    if !block.upgrade(stat) {
        tx.rollback().await?;
        debug!(%user_id, stat = column, "stat upgrade skipped; no points available");
        return Ok(StatUpgrade::NoPoints(block));
    }

    // `column` comes from the closed `Stat` enum, never from user input.
    sqlx::query(&format!(
        "UPDATE stats SET stat_points = $2, {column} = $3 WHERE user_id = $1"
    ))
    .bind(user_id)
    .bind(block.stat_points)
    .bind(block.get(stat))
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(%user_id, stat = column, "stat upgraded");

    Ok(StatUpgrade::Applied(block))
}
