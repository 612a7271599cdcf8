use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::utility::messages::{page_footer, page_out_of_range_message};
use hxbit_database::impls::leaderboard::{rank_of, top_accounts};
use hxbit_utils::formatting::format_leaderboard_line;
use hxbit_utils::pagination::{page_slice, total_pages};

pub const META: CommandMeta = CommandMeta {
    name: "leaderboard",
    desc: "Show the top accounts by total XP.",
    category: "social",
    usage: "!leaderboard [page]",
    failure: "Failed to load leaderboard",
};

const LEADERBOARD_PER_PAGE: usize = 10;

pub async fn leaderboard(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let requested_page = args.next_parsed::<usize>().unwrap_or(1).max(1);
    let db = ctx.db();

    let entries = top_accounts(db).await?;
    if entries.is_empty() {
        ctx.say("Nobody is on the leaderboard yet.");
        return Ok(());
    }

    let total = total_pages(entries.len(), LEADERBOARD_PER_PAGE);
    if requested_page > total {
        ctx.say(page_out_of_range_message(requested_page, total));
        return Ok(());
    }

    ctx.say("Leaderboard");
    for entry in page_slice(&entries, LEADERBOARD_PER_PAGE, requested_page) {
        ctx.say(format_leaderboard_line(
            entry.rank,
            &entry.username,
            entry.level,
            entry.total_xp,
        ));
    }
    if total > 1 {
        ctx.say(page_footer(requested_page, total));
    }

    // Viewing works signed out; the caller's own rank is shown only with a session.
    if let Some(user_id) = ctx.data().session.user_id()
        && let Some(rank) = rank_of(db, user_id).await?
    {
        ctx.say(format!("Your rank: #{rank}"));
    }
    Ok(())
}
