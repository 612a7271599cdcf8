use anyhow::Context as _;
use chrono::NaiveDate;
use hxbit_core::{Completion, ValidationError};
use hxbit_utils::parse::{MAX_XP_REWARD, MIN_XP_REWARD};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    cache::invalidate_leaderboard,
    database::Database,
    impls::{now_i64, stats::add_stat_points},
    model::task::{CompleteTaskOutcome, Task, TaskCompletion},
};

pub struct NewTask<'a> {
    pub user_id: Uuid,
    pub activity_id: u64,
    pub title: &'a str,
    pub xp_reward: i32,
    pub due_date: Option<NaiveDate>,
    pub is_required: bool,
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    user_id: Uuid,
    activity_id: i64,
    title: String,
    xp_reward: i32,
    completed: bool,
    completed_at: Option<i64>,
    due_date: Option<NaiveDate>,
    is_required: bool,
    created_at: i64,
}

const TASK_COLUMNS: &str = "id, user_id, activity_id, title, xp_reward, completed, completed_at, \
     due_date, is_required, created_at";

/// Create a task under one of the user's activities. Returns `None` when the
/// activity does not exist or belongs to someone else.
pub async fn create_task(db: &Database, new: NewTask<'_>) -> anyhow::Result<Option<Task>> {
    let title = new.title.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingField("Task title").into());
    }
    if !(MIN_XP_REWARD..=MAX_XP_REWARD).contains(&new.xp_reward) {
        return Err(ValidationError::XpRewardOutOfRange {
            min: MIN_XP_REWARD,
            max: MAX_XP_REWARD,
        }
        .into());
    }

    let activity_id_i64 = i64::try_from(new.activity_id).context("activity_id out of i64 range")?;
    let now = now_i64()?;

    let row: Option<TaskRow> = sqlx::query_as(&format!(
        "INSERT INTO tasks (user_id, activity_id, title, xp_reward, due_date, is_required, created_at)
         SELECT $1, a.id, $3, $4, $5, $6, $7
         FROM activities a
         WHERE a.id = $2 AND a.user_id = $1
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(new.user_id)
    .bind(activity_id_i64)
    .bind(title)
    .bind(new.xp_reward)
    .bind(new.due_date)
    .bind(new.is_required)
    .bind(now)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_task).transpose()
}

/// List an activity's tasks: open tasks first, then by due date (undated last).
pub async fn list_tasks(db: &Database, user_id: Uuid, activity_id: u64) -> anyhow::Result<Vec<Task>> {
    let activity_id_i64 = i64::try_from(activity_id).context("activity_id out of i64 range")?;

    let rows: Vec<TaskRow> = sqlx::query_as(&format!(
        "SELECT {TASK_COLUMNS}
         FROM tasks
         WHERE activity_id = $1 AND user_id = $2"
    ))
    .bind(activity_id_i64)
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    let mut tasks = rows.into_iter().map(to_task).collect::<anyhow::Result<Vec<_>>>()?;
    sort_for_display(&mut tasks);
    Ok(tasks)
}

pub async fn delete_task(db: &Database, user_id: Uuid, task_id: u64) -> anyhow::Result<bool> {
    let task_id_i64 = i64::try_from(task_id).context("task_id out of i64 range")?;

    let deleted = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id_i64)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

/// Complete a task and apply its reward.
///
/// In one transaction: mark the task completed, recompute the owning
/// activity's XP/level, recompute the account's XP/level, then award stat
/// points. The task update only matches open tasks, so a repeated submission
/// finds nothing to do and reports `AlreadyCompleted`.
pub async fn complete_task(
    db: &Database,
    user_id: Uuid,
    task_id: u64,
) -> anyhow::Result<CompleteTaskOutcome> {
    let task_id_i64 = i64::try_from(task_id).context("task_id out of i64 range")?;
    let now = now_i64()?;

    let mut tx = db.pool().begin().await?;

    let marked: Option<(i64, i32)> = sqlx::query_as(
        "UPDATE tasks
         SET completed = TRUE, completed_at = $1
         WHERE id = $2 AND user_id = $3 AND completed = FALSE
         RETURNING activity_id, xp_reward",
    )
    .bind(now)
    .bind(task_id_i64)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((activity_id, xp_reward)) = marked else {
        tx.rollback().await?;

        let completed: Option<bool> =
            sqlx::query_scalar("SELECT completed FROM tasks WHERE id = $1 AND user_id = $2")
                .bind(task_id_i64)
                .bind(user_id)
                .fetch_optional(db.pool())
                .await?;

        return Ok(match completed {
            Some(true) => CompleteTaskOutcome::AlreadyCompleted,
            _ => CompleteTaskOutcome::NotFound,
        });
    };

    let (activity_name, activity_xp): (String, i64) =
        sqlx::query_as("SELECT name, xp FROM activities WHERE id = $1 FOR UPDATE")
            .bind(activity_id)
            .fetch_one(&mut *tx)
            .await?;

    let account_xp: i64 =
        sqlx::query_scalar("SELECT total_xp FROM accounts WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

    let completion = Completion::compute(activity_xp, account_xp, xp_reward);

    sqlx::query("UPDATE activities SET xp = $1, level = $2 WHERE id = $3")
        .bind(completion.activity_xp)
        .bind(completion.activity_level)
        .bind(activity_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE accounts SET total_xp = $1, level = $2 WHERE user_id = $3")
        .bind(completion.account_xp)
        .bind(completion.account_level)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if completion.stat_points > 0 {
        add_stat_points(&mut tx, user_id, completion.stat_points).await?;
    }

    tx.commit().await?;
    invalidate_leaderboard(db.cache()).await;

    info!(
        %user_id,
        task_id,
        xp_reward,
        activity_xp = completion.activity_xp,
        account_xp = completion.account_xp,
        stat_points = completion.stat_points,
        "task completed"
    );

    let activity_id = u64::try_from(activity_id).context("activity_id row out of u64 range")?;
    Ok(CompleteTaskOutcome::Completed(TaskCompletion {
        task_id,
        activity_id,
        activity_name,
        completion,
    }))
}

/// Open tasks before completed ones; within each group, earliest due date first, undated last.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then_with(|| match (a.due_date, b.due_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| b.is_required.cmp(&a.is_required))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn to_task(row: TaskRow) -> anyhow::Result<Task> {
    if row.xp_reward <= 0 {
        warn!(task_id = row.id, xp_reward = row.xp_reward, "task row has non-positive reward");
    }

    Ok(Task {
        id: u64::try_from(row.id).context("id row out of u64 range")?,
        user_id: row.user_id,
        activity_id: u64::try_from(row.activity_id).context("activity_id row out of u64 range")?,
        title: row.title,
        xp_reward: row.xp_reward,
        completed: row.completed,
        completed_at: row
            .completed_at
            .map(u64::try_from)
            .transpose()
            .context("completed_at row out of u64 range")?,
        due_date: row.due_date,
        is_required: row.is_required,
        created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use hxbit_core::ValidationError;
    use uuid::Uuid;

    use super::{NewTask, complete_task, create_task, list_tasks, sort_for_display};
    use crate::{
        database::{
            Database,
            testing::{migrated_database, seed_account, seed_task},
        },
        impls::{accounts::get_account, activities::get_activity, stats::get_stats},
        model::task::{CompleteTaskOutcome, Task},
    };

    fn task(id: u64, completed: bool, due: Option<(i32, u32, u32)>, is_required: bool) -> Task {
        Task {
            id,
            user_id: Uuid::nil(),
            activity_id: 1,
            title: format!("task {id}"),
            xp_reward: 10,
            completed,
            completed_at: None,
            due_date: due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            is_required,
            created_at: 0,
        }
    }

    #[test]
    fn open_tasks_sort_by_due_date_before_completed() {
        let mut tasks = vec![
            task(1, true, Some((2026, 1, 1)), false),
            task(2, false, None, false),
            task(3, false, Some((2026, 3, 1)), false),
            task(4, false, Some((2026, 2, 1)), false),
            task(5, false, None, true),
        ];
        sort_for_display(&mut tasks);

        let order: Vec<u64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(order, vec![4, 3, 5, 2, 1]);
    }

    #[tokio::test]
    async fn invalid_tasks_are_rejected_before_any_query() {
        let db = Database::connect_lazy("postgres://hxbit@127.0.0.1:1/unreachable").unwrap();

        let err = create_task(
            &db,
            NewTask {
                user_id: Uuid::nil(),
                activity_id: 1,
                title: "   ",
                xp_reward: 10,
                due_date: None,
                is_required: false,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::MissingField("Task title"))
        );

        let err = create_task(
            &db,
            NewTask {
                user_id: Uuid::nil(),
                activity_id: 1,
                title: "Study",
                xp_reward: 0,
                due_date: None,
                is_required: false,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::XpRewardOutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn concurrent_completions_apply_the_reward_once() {
        let Some(db) = migrated_database().await else {
            return;
        };
        let user_id = seed_account(&db).await;
        sqlx::query("UPDATE accounts SET total_xp = 450 WHERE user_id = $1")
            .bind(user_id)
            .execute(db.pool())
            .await
            .unwrap();
        let (activity_id, task_id) = seed_task(&db, user_id, 150).await;

        let (first, second) = tokio::join!(
            complete_task(&db, user_id, task_id),
            complete_task(&db, user_id, task_id)
        );
        let outcomes = [first.unwrap(), second.unwrap()];

        let completions: Vec<_> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                CompleteTaskOutcome::Completed(done) => Some(&done.completion),
                _ => None,
            })
            .collect();
        assert_eq!(completions.len(), 1);
        assert_eq!(
            outcomes
                .iter()
                .filter(|outcome| matches!(outcome, CompleteTaskOutcome::AlreadyCompleted))
                .count(),
            1
        );

        let completion = completions[0];
        assert_eq!(completion.activity_xp, 150);
        assert_eq!(completion.activity_level, 2);
        assert_eq!(completion.account_xp, 600);
        assert_eq!(completion.account_level, 2);
        assert_eq!(completion.stat_points, 2);

        let account = get_account(&db, user_id).await.unwrap().unwrap();
        assert_eq!((account.total_xp, account.level), (600, 2));
        let activity = get_activity(&db, user_id, activity_id).await.unwrap().unwrap();
        assert_eq!((activity.xp, activity.level), (150, 2));
        assert_eq!(get_stats(&db, user_id).await.unwrap().stat_points, 2);

        let again = complete_task(&db, user_id, task_id).await.unwrap();
        assert!(matches!(again, CompleteTaskOutcome::AlreadyCompleted));
        assert_eq!(get_stats(&db, user_id).await.unwrap().stat_points, 2);
    }

    #[tokio::test]
    async fn failed_stat_award_rolls_back_the_whole_completion() {
        let Some(db) = migrated_database().await else {
            return;
        };
        let user_id = seed_account(&db).await;
        let (activity_id, task_id) = seed_task(&db, user_id, 150).await;

        // The award is the last step; an overflowing balance makes it fail.
        sqlx::query("UPDATE stats SET stat_points = 2147483647 WHERE user_id = $1")
            .bind(user_id)
            .execute(db.pool())
            .await
            .unwrap();

        assert!(complete_task(&db, user_id, task_id).await.is_err());

        let tasks = list_tasks(&db, user_id, activity_id).await.unwrap();
        assert!(!tasks[0].completed);
        assert_eq!(tasks[0].completed_at, None);
        let activity = get_activity(&db, user_id, activity_id).await.unwrap().unwrap();
        assert_eq!((activity.xp, activity.level), (0, 1));
        let account = get_account(&db, user_id).await.unwrap().unwrap();
        assert_eq!((account.total_xp, account.level), (0, 1));
        assert_eq!(get_stats(&db, user_id).await.unwrap().stat_points, i32::MAX);
    }

    #[tokio::test]
    async fn unknown_or_foreign_tasks_are_not_found() {
        let Some(db) = migrated_database().await else {
            return;
        };
        let owner = seed_account(&db).await;
        let stranger = seed_account(&db).await;
        let (_, task_id) = seed_task(&db, owner, 20).await;

        let outcome = complete_task(&db, stranger, task_id).await.unwrap();
        assert!(matches!(outcome, CompleteTaskOutcome::NotFound));
        let outcome = complete_task(&db, owner, task_id).await.unwrap();
        assert!(matches!(outcome, CompleteTaskOutcome::Completed(_)));
        assert_eq!(get_stats(&db, owner).await.unwrap().stat_points, 0);
    }
}
