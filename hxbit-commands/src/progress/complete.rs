use tracing::debug;

use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_database::impls::tasks::complete_task;
use hxbit_database::model::task::{CompleteTaskOutcome, TaskCompletion};
use hxbit_utils::formatting::format_thousands;

pub const META: CommandMeta = CommandMeta {
    name: "complete",
    desc: "Complete a task and collect its XP.",
    category: "progress",
    usage: "!complete <task id>",
    failure: "Failed to complete task",
};

pub async fn complete(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let Some(task_id) = args.next_parsed::<u64>() else {
        ctx.say(usage_message(META.usage));
        return Ok(());
    };

    let user_id = ctx.user_id().await?;
    match complete_task(ctx.db(), user_id, task_id).await? {
        CompleteTaskOutcome::Completed(done) => {
            ctx.toast(Toast::success(format!(
                "Task completed! +{} XP",
                done.completion.reward
            )));
            for line in completion_lines(&done) {
                ctx.say(line);
            }
            ctx.emit(done.completion.events());
        }
        CompleteTaskOutcome::AlreadyCompleted => {
            debug!(%user_id, task_id, "task already completed");
            ctx.toast(Toast::info(format!("Task #{task_id} is already completed.")));
        }
        CompleteTaskOutcome::NotFound => {
            ctx.say(format!("No task #{task_id}."));
        }
    }

    Ok(())
}

/// Where the activity and the account stand after the reward. Level-ups and
/// stat points are announced from the emitted progress events.
pub(crate) fn completion_lines(done: &TaskCompletion) -> Vec<String> {
    let completion = &done.completion;
    vec![
        format!(
            "{}: {} XP · Lv {}",
            done.activity_name,
            format_thousands(completion.activity_xp),
            completion.activity_level
        ),
        format!(
            "Account: {} XP · Lv {}",
            format_thousands(completion.account_xp),
            completion.account_level
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::completion_lines;
    use hxbit_core::Completion;
    use hxbit_database::model::task::TaskCompletion;

    fn done(activity_xp: i64, account_xp: i64, reward: i32) -> TaskCompletion {
        TaskCompletion {
            task_id: 1,
            activity_id: 2,
            activity_name: "Running".to_owned(),
            completion: Completion::compute(activity_xp, account_xp, reward),
        }
    }

    #[test]
    fn lines_show_both_totals() {
        assert_eq!(
            completion_lines(&done(80, 450, 30)),
            vec!["Running: 110 XP · Lv 2", "Account: 480 XP · Lv 1"]
        );
    }

    #[test]
    fn stat_points_are_left_to_the_progress_events() {
        let finished = done(0, 1_000, 150);
        let lines = completion_lines(&finished);
        assert_eq!(lines, vec!["Running: 150 XP · Lv 2", "Account: 1,150 XP · Lv 3"]);
        assert!(!lines.iter().any(|line| line.contains("stat point")));
        assert_eq!(finished.completion.stat_points, 2);
    }
}
