use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_database::impls::accounts::ensure_username_available;

pub const META: CommandMeta = CommandMeta {
    name: "username",
    desc: "Check whether a username is available.",
    category: "account",
    usage: "!username <name>",
    failure: "Failed to check username",
};

pub async fn username(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let Some(name) = args.next_word() else {
        ctx.say(usage_message(META.usage));
        return Ok(());
    };

    ensure_username_available(ctx.db(), name).await?;
    ctx.toast(Toast::success(format!("`{name}` is available.")));
    Ok(())
}
