use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use hxbit_core::Curve;
use hxbit_database::impls::accounts::{find_account_by_username, get_account};
use hxbit_database::impls::leaderboard::rank_of;
use hxbit_database::impls::social::{follow_counts, is_following};
use hxbit_database::model::account::{Account, FollowCounts};
use hxbit_utils::formatting::{format_thousands, format_xp_progress, progress_bar};

pub const META: CommandMeta = CommandMeta {
    name: "profile",
    desc: "Show your profile or another user's.",
    category: "account",
    usage: "!profile [username]",
    failure: "Failed to load profile",
};

const PROGRESS_BAR_WIDTH: usize = 20;

pub async fn profile(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let db = ctx.db();
    let account = match args.next_word() {
        Some(username) => find_account_by_username(db, username).await?,
        None => get_account(db, ctx.user_id().await?).await?,
    };

    let Some(account) = account else {
        ctx.say("No profile found.");
        return Ok(());
    };

    let counts = follow_counts(db, account.user_id).await?;
    let rank = rank_of(db, account.user_id).await?;

    for line in profile_lines(&account, counts, rank) {
        ctx.say(line);
    }

    if let Some(viewer_id) = ctx.data().session.user_id()
        && viewer_id != account.user_id
        && is_following(db, viewer_id, account.user_id).await?
    {
        ctx.say(format!("You follow {}.", account.username));
    }
    Ok(())
}

pub(crate) fn profile_lines(account: &Account, counts: FollowCounts, rank: Option<u64>) -> Vec<String> {
    let progress = Curve::Account.progress(account.total_xp);

    let mut lines = vec![
        format!("{} (@{})", account.shown_name(), account.username),
        format!(
            "Level {} · {} XP total",
            progress.level,
            format_thousands(account.total_xp)
        ),
        format!(
            "{} {} · {} XP to level {}",
            progress_bar(progress.percent, PROGRESS_BAR_WIDTH),
            format_xp_progress(progress.into_level, progress.span),
            format_thousands(progress.to_next),
            progress.level.saturating_add(1)
        ),
        format!(
            "Followers: {} · Following: {}",
            counts.followers, counts.following
        ),
    ];

    if let Some(rank) = rank {
        lines.push(format!("Leaderboard rank: #{rank}"));
    }
    if let Some(bio) = account.bio.as_deref() {
        lines.push(format!("Bio: {bio}"));
    }
    if let Some(url) = account.avatar_url.as_deref() {
        lines.push(format!("Avatar: {url}"));
    }

    lines
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::profile_lines;
    use hxbit_database::model::account::{Account, FollowCounts};

    fn account(total_xp: i64) -> Account {
        Account {
            user_id: Uuid::nil(),
            username: "nova".to_owned(),
            display_name: Some("Nova".to_owned()),
            bio: None,
            avatar_url: None,
            level: 3,
            total_xp,
            created_at: 0,
        }
    }

    #[test]
    fn renders_level_progress_and_counts() {
        let lines = profile_lines(
            &account(1_250),
            FollowCounts {
                followers: 4,
                following: 2,
            },
            Some(7),
        );

        assert_eq!(lines[0], "Nova (@nova)");
        assert_eq!(lines[1], "Level 3 · 1,250 XP total");
        assert_eq!(
            lines[2],
            "[##########----------] 250/500 XP · 250 XP to level 4"
        );
        assert_eq!(lines[3], "Followers: 4 · Following: 2");
        assert_eq!(lines[4], "Leaderboard rank: #7");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn optional_fields_are_appended() {
        let mut account = account(0);
        account.bio = Some("Runner".to_owned());
        account.avatar_url = Some("https://cdn.test/a.png".to_owned());

        let lines = profile_lines(&account, FollowCounts::default(), None);
        assert_eq!(lines[1], "Level 1 · 0 XP total");
        assert_eq!(lines[4], "Bio: Runner");
        assert_eq!(lines[5], "Avatar: https://cdn.test/a.png");
    }
}
