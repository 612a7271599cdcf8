use crate::CommandMeta;
use crate::args::{Args, split_fields};
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_core::ValidationError;
use hxbit_database::impls::internships::{
    NewInternship, add_internship, delete_internship, list_internships, update_internship_status,
};
use hxbit_database::model::internship::{Internship, InternshipStatus};
use hxbit_utils::parse::parse_due_date;
use hxbit_utils::time::today_utc;

pub const META: CommandMeta = CommandMeta {
    name: "internship",
    desc: "Track internship applications and their status.",
    category: "tracking",
    usage: "!internship <add|list|status|delete> [company | role | status | start | end] [id] [status]",
    failure: "Failed to update internships",
};

pub async fn internship(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let action = args.next_word().map(str::to_ascii_lowercase);
    if !matches!(
        action.as_deref(),
        Some("add" | "list" | "status" | "delete")
    ) {
        ctx.say(usage_message(META.usage));
        return Ok(());
    }

    let user_id = ctx.user_id().await?;
    let db = ctx.db();

    match action.as_deref() {
        Some("add") => {
            let fields = split_fields(args.rest().unwrap_or(""));
            let field = |idx: usize| fields.get(idx).copied().flatten();

            let company = field(0).ok_or(ValidationError::MissingField("Company"))?;
            let role = field(1).ok_or(ValidationError::MissingField("Role"))?;
            let status = field(2)
                .map(str::parse::<InternshipStatus>)
                .transpose()?
                .unwrap_or(InternshipStatus::Applied);
            let date = |idx: usize| {
                field(idx)
                    .map(|raw| {
                        parse_due_date(raw, today_utc())
                            .ok_or_else(|| ValidationError::InvalidDate(raw.to_owned()))
                    })
                    .transpose()
            };

            let internship = add_internship(
                db,
                NewInternship {
                    user_id,
                    company,
                    role,
                    status,
                    start_date: date(3)?,
                    end_date: date(4)?,
                },
            )
            .await?;
            ctx.toast(Toast::success(format!(
                "Tracking #{} {} at {}.",
                internship.id, internship.role, internship.company
            )));
        }
        Some("status") => {
            let (Some(internship_id), Some(raw_status)) =
                (args.next_parsed::<u64>(), args.next_word())
            else {
                ctx.say(usage_message("!internship status <id> <status>"));
                return Ok(());
            };
            let status = raw_status.parse::<InternshipStatus>()?;

            if update_internship_status(db, user_id, internship_id, status).await? {
                ctx.toast(Toast::success(format!(
                    "Internship #{internship_id} is now {}.",
                    status.display_name()
                )));
            } else {
                ctx.say(format!("No internship #{internship_id}."));
            }
        }
        Some("delete") => {
            let Some(internship_id) = args.next_parsed::<u64>() else {
                ctx.say(usage_message("!internship delete <id>"));
                return Ok(());
            };
            if delete_internship(db, user_id, internship_id).await? {
                ctx.toast(Toast::success(format!("Deleted internship #{internship_id}.")));
            } else {
                ctx.say(format!("No internship #{internship_id}."));
            }
        }
        _ => {
            let internships = list_internships(db, user_id).await?;
            if internships.is_empty() {
                ctx.say("No internships tracked yet.");
            }
            for internship in &internships {
                ctx.say(internship_line(internship));
            }
        }
    }

    Ok(())
}

pub(crate) fn internship_line(internship: &Internship) -> String {
    let mut line = format!(
        "#{} {} at {} · {}",
        internship.id,
        internship.role,
        internship.company,
        internship.status.display_name()
    );

    match (internship.start_date, internship.end_date) {
        (Some(start), Some(end)) => line.push_str(&format!(
            " · {} to {}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )),
        (Some(start), None) => line.push_str(&format!(" · from {}", start.format("%Y-%m-%d"))),
        (None, Some(end)) => line.push_str(&format!(" · until {}", end.format("%Y-%m-%d"))),
        (None, None) => {}
    }

    line
}
