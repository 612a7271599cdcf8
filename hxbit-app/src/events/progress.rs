use tracing::{info, warn};
use uuid::Uuid;

use hxbit_commands::Data;
use hxbit_core::ProgressEvent;
use hxbit_database::impls::social::post_achievement;
use hxbit_utils::formatting::pluralize;

/// React to the progress a command reported: build the celebration lines and
/// publish an achievement post for every account level-up.
pub async fn handle_progress_events(data: &Data, events: &[ProgressEvent]) -> Vec<String> {
    if events.is_empty() {
        return Vec::new();
    }

    let user_id = data.session.user_id();
    let mut lines = Vec::with_capacity(events.len());

    for event in events {
        lines.push(celebration_message(event));

        match event {
            ProgressEvent::AccountLevelUp { from, to } => {
                info!(?user_id, from, to, "account leveled up");
                if let Some(user_id) = user_id {
                    publish_achievement(data, user_id, *to).await;
                }
            }
            ProgressEvent::ActivityLevelUp { from, to } => {
                info!(?user_id, from, to, "activity leveled up");
            }
            ProgressEvent::StatPointsAwarded { points } => {
                info!(?user_id, points, "stat points awarded");
            }
        }
    }

    lines
}

async fn publish_achievement(data: &Data, user_id: Uuid, level: i32) {
    if let Err(err) = post_achievement(&data.db, user_id, &achievement_text(level)).await {
        warn!(?err, %user_id, level, "failed to publish achievement post");
    }
}

pub fn celebration_message(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::ActivityLevelUp { to, .. } => {
            format!("★ Activity level up! Now level {to}.")
        }
        ProgressEvent::AccountLevelUp { to, .. } => {
            format!("★★ LEVEL UP! You reached account level {to}.")
        }
        ProgressEvent::StatPointsAwarded { points } => format!(
            "You earned {points} stat {} to spend with `!upgrade`.",
            pluralize(i64::from(*points), "point", "points")
        ),
    }
}

pub fn achievement_text(level: i32) -> String {
    format!("Reached account level {level}!")
}

#[cfg(test)]
mod tests {
    use hxbit_core::{Completion, ProgressEvent};

    use super::{achievement_text, celebration_message};

    #[test]
    fn one_line_per_event() {
        let completion = Completion::compute(90, 480, 150);
        let lines: Vec<String> = completion.events().iter().map(celebration_message).collect();

        assert_eq!(
            lines,
            vec![
                "★ Activity level up! Now level 3.",
                "★★ LEVEL UP! You reached account level 2.",
                "You earned 2 stat points to spend with `!upgrade`.",
            ]
        );
    }

    #[test]
    fn single_point_is_singular() {
        assert_eq!(
            celebration_message(&ProgressEvent::StatPointsAwarded { points: 1 }),
            "You earned 1 stat point to spend with `!upgrade`."
        );
    }

    #[test]
    fn achievement_posts_name_the_level() {
        assert_eq!(achievement_text(4), "Reached account level 4!");
    }
}
