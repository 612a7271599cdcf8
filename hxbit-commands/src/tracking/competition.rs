use crate::CommandMeta;
use crate::args::{Args, split_fields};
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_core::ValidationError;
use hxbit_database::impls::competitions::{
    NewCompetition, add_competition, delete_competition, list_competitions, record_placement,
};
use hxbit_database::model::competition::Competition;
use hxbit_utils::parse::parse_due_date;
use hxbit_utils::time::today_utc;

pub const META: CommandMeta = CommandMeta {
    name: "competition",
    desc: "Track competitions you entered and how you placed.",
    category: "tracking",
    usage: "!competition <add|list|result|delete> [name | organizer | date] [id] [placement]",
    failure: "Failed to update competitions",
};

pub async fn competition(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let action = args.next_word().map(str::to_ascii_lowercase);
    if !matches!(
        action.as_deref(),
        Some("add" | "list" | "result" | "delete")
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
            let held_on = field(2)
                .map(|raw| {
                    parse_due_date(raw, today_utc())
                        .ok_or_else(|| ValidationError::InvalidDate(raw.to_owned()))
                })
                .transpose()?;

            let competition = add_competition(
                db,
                NewCompetition {
                    user_id,
                    name: field(0).unwrap_or(""),
                    organizer: field(1),
                    held_on,
                },
            )
            .await?;
            ctx.toast(Toast::success(format!(
                "Added competition #{} {}.",
                competition.id, competition.name
            )));
        }
        Some("result") => {
            let (Some(competition_id), Some(placement)) = (args.next_parsed::<u64>(), args.rest())
            else {
                ctx.say(usage_message("!competition result <id> <placement>"));
                return Ok(());
            };
            if record_placement(db, user_id, competition_id, placement).await? {
                ctx.toast(Toast::success(format!(
                    "Recorded `{placement}` for competition #{competition_id}."
                )));
            } else {
                ctx.say(format!("No competition #{competition_id}."));
            }
        }
        Some("delete") => {
            let Some(competition_id) = args.next_parsed::<u64>() else {
                ctx.say(usage_message("!competition delete <id>"));
                return Ok(());
            };
            if delete_competition(db, user_id, competition_id).await? {
                ctx.toast(Toast::success(format!("Deleted competition #{competition_id}.")));
            } else {
                ctx.say(format!("No competition #{competition_id}."));
            }
        }
        _ => {
            let competitions = list_competitions(db, user_id).await?;
            if competitions.is_empty() {
                ctx.say("No competitions tracked yet.");
            }
            for competition in &competitions {
                ctx.say(competition_line(competition));
            }
        }
    }

    Ok(())
}

pub(crate) fn competition_line(competition: &Competition) -> String {
    let mut line = format!("#{} {}", competition.id, competition.name);
    if let Some(organizer) = competition.organizer.as_deref() {
        line.push_str(&format!(" ({organizer})"));
    }
    if let Some(held_on) = competition.held_on {
        line.push_str(&format!(" · {}", held_on.format("%Y-%m-%d")));
    }
    line.push_str(&format!(
        " · {}",
        competition.placement.as_deref().unwrap_or("no result yet")
    ));
    line
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::competition_line;
    use hxbit_database::model::competition::Competition;

    #[test]
    fn competition_lines() {
        let mut competition = Competition {
            id: 2,
            user_id: Uuid::nil(),
            name: "Regional Hackathon".to_owned(),
            organizer: Some("MLH".to_owned()),
            held_on: NaiveDate::from_ymd_opt(2026, 11, 2),
            placement: None,
            created_at: 0,
        };
        assert_eq!(
            competition_line(&competition),
            "#2 Regional Hackathon (MLH) · 2026-11-02 · no result yet"
        );

        competition.organizer = None;
        competition.held_on = None;
        competition.placement = Some("2nd place".to_owned());
        assert_eq!(competition_line(&competition), "#2 Regional Hackathon · 2nd place");
    }
}
