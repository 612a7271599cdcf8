use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::utility::messages::{page_footer, page_out_of_range_message};
use hxbit_database::impls::social::feed as load_feed;
use hxbit_database::model::social::{FeedItem, PostKind};
use hxbit_utils::pagination::{page_slice, total_pages};
use hxbit_utils::time::{format_relative_age, now_unix_secs};

pub const META: CommandMeta = CommandMeta {
    name: "feed",
    desc: "Show recent posts from you and the people you follow.",
    category: "social",
    usage: "!feed [page]",
    failure: "Failed to load feed",
};

const FEED_LIMIT: u32 = 100;
const FEED_POSTS_PER_PAGE: usize = 10;

pub async fn feed(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let requested_page = args.next_parsed::<usize>().unwrap_or(1).max(1);

    let user_id = ctx.user_id().await?;
    let items = load_feed(ctx.db(), user_id, FEED_LIMIT).await?;
    if items.is_empty() {
        ctx.say("Your feed is empty. Follow people with `!follow <username>`.");
        return Ok(());
    }

    let total = total_pages(items.len(), FEED_POSTS_PER_PAGE);
    if requested_page > total {
        ctx.say(page_out_of_range_message(requested_page, total));
        return Ok(());
    }

    let now = now_unix_secs();
    for item in page_slice(&items, FEED_POSTS_PER_PAGE, requested_page) {
        ctx.say(feed_line(item, now));
    }
    if total > 1 {
        ctx.say(page_footer(requested_page, total));
    }
    Ok(())
}

pub(crate) fn feed_line(item: &FeedItem, now: u64) -> String {
    let marker = match item.post.kind {
        PostKind::Achievement => "🏆 ",
        PostKind::Status => "",
    };
    format!(
        "{} · {} · {marker}{}",
        item.author_username,
        format_relative_age(item.post.created_at, now),
        item.post.content
    )
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::feed_line;
    use hxbit_database::model::social::{FeedItem, Post, PostKind};

    fn item(kind: PostKind, content: &str) -> FeedItem {
        FeedItem {
            post: Post {
                id: 1,
                user_id: Uuid::nil(),
                kind,
                content: content.to_owned(),
                created_at: 1_000,
            },
            author_username: "nova".to_owned(),
        }
    }

    #[test]
    fn feed_lines_mark_achievements() {
        assert_eq!(
            feed_line(&item(PostKind::Status, "Shipped it"), 1_030),
            "nova · just now · Shipped it"
        );
        assert_eq!(
            feed_line(&item(PostKind::Achievement, "Reached level 3"), 1_000 + 3 * 3_600),
            "nova · 3h ago · 🏆 Reached level 3"
        );
    }
}
