use chrono::NaiveDate;

use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::utility::messages::usage_message;
use crate::progress::activity::activity_line;
use hxbit_database::impls::activities::get_activity;
use hxbit_database::impls::tasks::list_tasks;
use hxbit_database::model::task::Task;
use hxbit_utils::time::{format_due, format_relative_age, now_unix_secs, today_utc};

pub const META: CommandMeta = CommandMeta {
    name: "tasks",
    desc: "List the tasks of an activity.",
    category: "progress",
    usage: "!tasks <activity id>",
    failure: "Failed to load tasks",
};

pub async fn tasks(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let Some(activity_id) = args.next_parsed::<u64>() else {
        ctx.say(usage_message(META.usage));
        return Ok(());
    };

    let user_id = ctx.user_id().await?;
    let Some(activity) = get_activity(ctx.db(), user_id, activity_id).await? else {
        ctx.say(format!("No activity #{activity_id}."));
        return Ok(());
    };
    ctx.say(activity_line(&activity));

    let tasks = list_tasks(ctx.db(), user_id, activity_id).await?;
    if tasks.is_empty() {
        ctx.say(format!(
            "No tasks for activity #{activity_id}. Add one with `!task add`."
        ));
        return Ok(());
    }

    let today = today_utc();
    let now = now_unix_secs();
    for task in &tasks {
        ctx.say(task_line(task, today, now));
    }
    Ok(())
}

pub(crate) fn task_line(task: &Task, today: NaiveDate, now: u64) -> String {
    let mut line = format!(
        "[{}] #{} {} · {} XP",
        if task.completed { "x" } else { " " },
        task.id,
        task.title,
        task.xp_reward
    );

    if task.is_required {
        line.push_str(" · required");
    }

    match (task.completed, task.completed_at, task.due_date) {
        (true, Some(at), _) => line.push_str(&format!(" · done {}", format_relative_age(at, now))),
        (false, _, Some(due)) => line.push_str(&format!(" · {}", format_due(due, today))),
        _ => {}
    }

    line
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::task_line;
    use hxbit_database::model::task::Task;

    fn task() -> Task {
        Task {
            id: 9,
            user_id: Uuid::nil(),
            activity_id: 1,
            title: "Run 5k".to_owned(),
            xp_reward: 50,
            completed: false,
            completed_at: None,
            due_date: None,
            is_required: false,
            created_at: 0,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn open_task_shows_due_date() {
        let mut task = task();
        task.due_date = Some(date(2026, 3, 3));
        task.is_required = true;

        assert_eq!(
            task_line(&task, date(2026, 3, 1), 0),
            "[ ] #9 Run 5k · 50 XP · required · Due in 2 days"
        );
    }

    #[test]
    fn completed_task_shows_age_instead_of_due() {
        let mut task = task();
        task.completed = true;
        task.completed_at = Some(1_000);
        task.due_date = Some(date(2026, 2, 1));

        assert_eq!(
            task_line(&task, date(2026, 3, 1), 1_000 + 7_200),
            "[x] #9 Run 5k · 50 XP · done 2h ago"
        );
    }

    #[test]
    fn overdue_open_task() {
        let mut task = task();
        task.due_date = Some(date(2026, 2, 28));
        assert_eq!(
            task_line(&task, date(2026, 3, 1), 0),
            "[ ] #9 Run 5k · 50 XP · Overdue by 1 day"
        );
    }
}
