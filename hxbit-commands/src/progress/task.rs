use chrono::NaiveDate;
use uuid::Uuid;

use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_core::ValidationError;
use hxbit_database::impls::tasks::{NewTask, create_task, delete_task};
use hxbit_utils::parse::{MAX_XP_REWARD, MIN_XP_REWARD, parse_due_date, parse_xp_reward};
use hxbit_utils::time::{format_due, today_utc};

pub const META: CommandMeta = CommandMeta {
    name: "task",
    desc: "Add a task to an activity, or delete one.",
    category: "progress",
    usage: "!task <add|delete> <activity id> <xp> [due=<date>] [required] <title>",
    failure: "Failed to update tasks",
};

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TaskDraft<'a> {
    pub activity_id: u64,
    pub xp_reward: i32,
    pub due_date: Option<NaiveDate>,
    pub is_required: bool,
    pub title: &'a str,
}

impl<'a> TaskDraft<'a> {
    fn into_new(self, user_id: Uuid) -> NewTask<'a> {
        NewTask {
            user_id,
            activity_id: self.activity_id,
            title: self.title,
            xp_reward: self.xp_reward,
            due_date: self.due_date,
            is_required: self.is_required,
        }
    }
}

pub async fn task(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    match args.next_word().map(str::to_ascii_lowercase).as_deref() {
        Some("add") => {
            let today = today_utc();
            let Some(draft) = parse_task_draft(args, today)? else {
                ctx.say(usage_message(META.usage));
                return Ok(());
            };

            let user_id = ctx.user_id().await?;
            let activity_id = draft.activity_id;
            let Some(task) = create_task(ctx.db(), draft.into_new(user_id)).await? else {
                ctx.say(format!("No activity #{activity_id}."));
                return Ok(());
            };

            let due = task
                .due_date
                .map(|due| format!(" ({})", format_due(due, today)))
                .unwrap_or_default();
            ctx.toast(Toast::success(format!(
                "Added task #{} {} worth {} XP{due}.",
                task.id, task.title, task.xp_reward
            )));
        }
        Some("delete") => {
            let Some(task_id) = args.next_parsed::<u64>() else {
                ctx.say(usage_message("!task delete <task id>"));
                return Ok(());
            };

            let user_id = ctx.user_id().await?;
            if delete_task(ctx.db(), user_id, task_id).await? {
                ctx.toast(Toast::success(format!("Deleted task #{task_id}.")));
            } else {
                ctx.say(format!("No task #{task_id}."));
            }
        }
        _ => ctx.say(usage_message(META.usage)),
    }

    Ok(())
}

/// Read `<activity id> <xp> [due=<date>] [required] <title>`.
///
/// `Ok(None)` means the shape is wrong and usage should be shown.
pub(crate) fn parse_task_draft(
    mut args: Args<'_>,
    today: NaiveDate,
) -> Result<Option<TaskDraft<'_>>, ValidationError> {
    let Some(activity_id) = args.next_parsed::<u64>() else {
        return Ok(None);
    };
    let Some(raw_xp) = args.next_word() else {
        return Ok(None);
    };
    let xp_reward = match parse_xp_reward(raw_xp) {
        Some(xp) => xp,
        None if raw_xp.parse::<i64>().is_ok() => {
            return Err(ValidationError::XpRewardOutOfRange {
                min: MIN_XP_REWARD,
                max: MAX_XP_REWARD,
            });
        }
        None => return Ok(None),
    };

    let mut due_date = None;
    let mut is_required = false;
    while let Some(word) = args.peek_word() {
        if let Some(raw_due) = word.strip_prefix("due=") {
            due_date = Some(
                parse_due_date(raw_due, today)
                    .ok_or_else(|| ValidationError::InvalidDate(raw_due.to_owned()))?,
            );
        } else if word.eq_ignore_ascii_case("required") {
            is_required = true;
        } else {
            break;
        }
        args.next_word();
    }

    let Some(title) = args.rest() else {
        return Err(ValidationError::MissingField("Task title"));
    };

    Ok(Some(TaskDraft {
        activity_id,
        xp_reward,
        due_date,
        is_required,
        title,
    }))
}
