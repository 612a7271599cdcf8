use chrono::DateTime;

use crate::CommandMeta;
use crate::args::{Args, split_fields};
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_core::ValidationError;
use hxbit_database::impls::schedule::{NewScheduleEvent, add_event, delete_event, upcoming_events};
use hxbit_database::model::schedule::ScheduleEvent;
use hxbit_utils::parse::{parse_datetime_unix, parse_duration_seconds};
use hxbit_utils::time::{format_compact_duration, now_unix_secs};

pub const META: CommandMeta = CommandMeta {
    name: "schedule",
    desc: "Plan events and list what is coming up.",
    category: "tracking",
    usage: "!schedule <add|list|delete> [start end|duration title | location] [id]",
    failure: "Failed to update schedule",
};

const UPCOMING_LIMIT: u32 = 20;

pub async fn schedule(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let action = args.next_word().map(str::to_ascii_lowercase);
    if !matches!(action.as_deref(), Some("add" | "list" | "delete")) {
        ctx.say(usage_message(META.usage));
        return Ok(());
    }

    let user_id = ctx.user_id().await?;
    let db = ctx.db();

    match action.as_deref() {
        Some("add") => {
            let (Some(raw_start), Some(raw_end)) = (args.next_word(), args.next_word()) else {
                ctx.say(usage_message(
                    "!schedule add <YYYY-MM-DDTHH:MM> <end or duration> <title> [| location]",
                ));
                return Ok(());
            };
            let (starts_at, ends_at) = parse_event_window(raw_start, raw_end)?;

            let fields = split_fields(args.rest().unwrap_or(""));
            let field = |idx: usize| fields.get(idx).copied().flatten();

            let event = add_event(
                db,
                NewScheduleEvent {
                    user_id,
                    title: field(0).unwrap_or(""),
                    location: field(1),
                    starts_at,
                    ends_at,
                },
            )
            .await?;
            ctx.toast(Toast::success(format!(
                "Scheduled #{} {} for {}.",
                event.id,
                event.title,
                format_timestamp(event.starts_at)
            )));
        }
        Some("delete") => {
            let Some(event_id) = args.next_parsed::<u64>() else {
                ctx.say(usage_message("!schedule delete <id>"));
                return Ok(());
            };
            if delete_event(db, user_id, event_id).await? {
                ctx.toast(Toast::success(format!("Deleted event #{event_id}.")));
            } else {
                ctx.say(format!("No event #{event_id}."));
            }
        }
        _ => {
            let events = upcoming_events(db, user_id, now_unix_secs(), UPCOMING_LIMIT).await?;
            if events.is_empty() {
                ctx.say("Nothing scheduled.");
            }
            for event in &events {
                ctx.say(event_line(event));
            }
        }
    }

    Ok(())
}

/// Start must be a timestamp; the second value is either an end timestamp or a duration.
pub(crate) fn parse_event_window(
    raw_start: &str,
    raw_end: &str,
) -> Result<(u64, u64), ValidationError> {
    let starts_at = parse_datetime_unix(raw_start)
        .and_then(|secs| u64::try_from(secs).ok())
        .ok_or_else(|| ValidationError::InvalidDate(raw_start.to_owned()))?;

    let ends_at = match parse_datetime_unix(raw_end) {
        Some(secs) => u64::try_from(secs).map_err(|_| ValidationError::EventEndsBeforeStart)?,
        // The end is stored as a signed timestamp.
        None => parse_duration_seconds(raw_end)
            .and_then(|duration| starts_at.checked_add(duration))
            .filter(|end| i64::try_from(*end).is_ok())
            .ok_or_else(|| ValidationError::InvalidDate(raw_end.to_owned()))?,
    };

    if ends_at < starts_at {
        return Err(ValidationError::EventEndsBeforeStart);
    }

    Ok((starts_at, ends_at))
}

fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|at| at.format("%a %Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}

pub(crate) fn event_line(event: &ScheduleEvent) -> String {
    let mut line = format!(
        "#{} {} · {} · {}",
        event.id,
        format_timestamp(event.starts_at),
        format_compact_duration(event.duration_seconds()),
        event.title
    );
    if let Some(location) = event.location.as_deref() {
        line.push_str(&format!(" @ {location}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{event_line, parse_event_window};
    use hxbit_core::ValidationError;
    use hxbit_database::model::schedule::ScheduleEvent;

    // 2026-03-02T09:00 UTC
    const MONDAY_NINE: u64 = 1_772_442_000;

    #[test]
    fn end_can_be_a_time_or_a_duration() {
        assert_eq!(
            parse_event_window("2026-03-02T09:00", "2026-03-02T10:30"),
            Ok((MONDAY_NINE, MONDAY_NINE + 5_400))
        );
        assert_eq!(
            parse_event_window("2026-03-02T09:00", "1h30m"),
            Ok((MONDAY_NINE, MONDAY_NINE + 5_400))
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        assert_eq!(
            parse_event_window("2026-03-02T09:00", "2026-03-02T08:59"),
            Err(ValidationError::EventEndsBeforeStart)
        );
        assert_eq!(
            parse_event_window("monday", "1h"),
            Err(ValidationError::InvalidDate("monday".to_owned()))
        );
    }

    #[test]
    fn durations_past_the_storable_range_are_rejected() {
        assert_eq!(
            parse_event_window("2026-03-02T09:00", "9223372036854775000s"),
            Err(ValidationError::InvalidDate("9223372036854775000s".to_owned()))
        );
        assert_eq!(
            parse_event_window("2026-03-02T09:00", "18446744073709551000s"),
            Err(ValidationError::InvalidDate("18446744073709551000s".to_owned()))
        );
    }

    #[test]
    fn event_lines() {
        let event = ScheduleEvent {
            id: 7,
            user_id: Uuid::nil(),
            title: "Standup".to_owned(),
            location: Some("Room 2".to_owned()),
            starts_at: MONDAY_NINE,
            ends_at: MONDAY_NINE + 900,
            created_at: 0,
        };
        assert_eq!(
            event_line(&event),
            "#7 Mon 2026-03-02 09:00 · 15m · Standup @ Room 2"
        );
    }
}
