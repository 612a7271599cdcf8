use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_database::impls::social::follow as follow_user;

pub const META: CommandMeta = CommandMeta {
    name: "follow",
    desc: "Follow another user to see their posts in your feed.",
    category: "social",
    usage: "!follow <username>",
    failure: "Failed to follow user",
};

pub async fn follow(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let Some(username) = args.next_word() else {
        ctx.say(usage_message(META.usage));
        return Ok(());
    };

    let user_id = ctx.user_id().await?;
    let Some(target_id) = ctx.lookup_user(username).await? else {
        return Ok(());
    };

    if follow_user(ctx.db(), user_id, target_id).await? {
        ctx.toast(Toast::success(format!("You are now following {username}.")));
    } else {
        ctx.toast(Toast::info(format!("You already follow {username}.")));
    }
    Ok(())
}
