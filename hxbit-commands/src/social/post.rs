use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_database::impls::social::create_post;
use hxbit_database::model::social::PostKind;

pub const META: CommandMeta = CommandMeta {
    name: "post",
    desc: "Share a status update with your followers.",
    category: "social",
    usage: "!post <text>",
    failure: "Failed to publish post",
};

pub async fn post(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let Some(text) = args.rest() else {
        ctx.say(usage_message(META.usage));
        return Ok(());
    };

    let user_id = ctx.user_id().await?;
    let post = create_post(ctx.db(), user_id, PostKind::Status, text).await?;
    ctx.toast(Toast::success(format!("Posted #{}.", post.id)));
    Ok(())
}
