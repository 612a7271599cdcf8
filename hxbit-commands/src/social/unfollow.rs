use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_database::impls::social::unfollow as unfollow_user;

pub const META: CommandMeta = CommandMeta {
    name: "unfollow",
    desc: "Stop following a user.",
    category: "social",
    usage: "!unfollow <username>",
    failure: "Failed to unfollow user",
};

pub async fn unfollow(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let Some(username) = args.next_word() else {
        ctx.say(usage_message(META.usage));
        return Ok(());
    };

    let user_id = ctx.user_id().await?;
    let Some(target_id) = ctx.lookup_user(username).await? else {
        return Ok(());
    };

    if unfollow_user(ctx.db(), user_id, target_id).await? {
        ctx.toast(Toast::success(format!("Unfollowed {username}.")));
    } else {
        ctx.toast(Toast::info(format!("You were not following {username}.")));
    }
    Ok(())
}
