use crate::CommandMeta;
use crate::args::{Args, split_fields};
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_core::Curve;
use hxbit_database::impls::activities::{
    NewActivity, create_activity, delete_activity, list_activities,
};
use hxbit_database::model::activity::Activity;
use hxbit_utils::formatting::{format_xp_progress, progress_bar};

pub const META: CommandMeta = CommandMeta {
    name: "activity",
    desc: "Add, list or delete the activities you level up.",
    category: "progress",
    usage: "!activity <add|list|delete> [name | category | description] [id]",
    failure: "Failed to update activities",
};

pub async fn activity(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let action = args.next_word().map(str::to_ascii_lowercase);
    let user_id = match action.as_deref() {
        Some("add" | "list" | "delete") => ctx.user_id().await?,
        _ => {
            ctx.say(usage_message(META.usage));
            return Ok(());
        }
    };
    let db = ctx.db();

    match action.as_deref() {
        Some("add") => {
            let fields = split_fields(args.rest().unwrap_or(""));
            let field = |idx: usize| fields.get(idx).copied().flatten();

            let activity = create_activity(
                db,
                NewActivity {
                    user_id,
                    name: field(0).unwrap_or(""),
                    category: field(1),
                    description: field(2),
                },
            )
            .await?;
            ctx.toast(Toast::success(format!(
                "Added activity #{} {}.",
                activity.id, activity.name
            )));
        }
        Some("delete") => {
            let Some(activity_id) = args.next_parsed::<u64>() else {
                ctx.say(usage_message("!activity delete <id>"));
                return Ok(());
            };
            if delete_activity(db, user_id, activity_id).await? {
                ctx.toast(Toast::success(format!(
                    "Deleted activity #{activity_id} and its tasks."
                )));
            } else {
                ctx.say(format!("No activity #{activity_id}."));
            }
        }
        _ => {
            let activities = list_activities(db, user_id).await?;
            if activities.is_empty() {
                ctx.say("No activities yet. Add one with `!activity add <name>`.");
            }
            for activity in &activities {
                ctx.say(activity_line(activity));
            }
        }
    }

    Ok(())
}

pub(crate) fn activity_line(activity: &Activity) -> String {
    let progress = Curve::Activity.progress(activity.xp);
    let category = activity
        .category
        .as_deref()
        .map(|category| format!(" [{category}]"))
        .unwrap_or_default();

    format!(
        "#{} {}{} · Lv {} · {} {}",
        activity.id,
        activity.name,
        category,
        progress.level,
        format_xp_progress(progress.into_level, progress.span),
        progress_bar(progress.percent, 10)
    )
}
