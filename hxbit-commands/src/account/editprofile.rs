use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_database::impls::accounts::update_profile;

pub const META: CommandMeta = CommandMeta {
    name: "editprofile",
    desc: "Change your display name or bio. Leave the text empty to clear it.",
    category: "account",
    usage: "!editprofile <name|bio> [text]",
    failure: "Failed to update profile",
};

pub async fn editprofile(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let field = args.next_word().map(str::to_ascii_lowercase);
    let text = args.rest().unwrap_or("");

    let (display_name, bio, label) = match field.as_deref() {
        Some("name") => (Some(text), None, "Display name"),
        Some("bio") => (None, Some(text), "Bio"),
        _ => {
            ctx.say(usage_message(META.usage));
            return Ok(());
        }
    };

    let user_id = ctx.user_id().await?;
    if !update_profile(ctx.db(), user_id, display_name, bio).await? {
        ctx.say("No profile found.");
        return Ok(());
    }

    let verb = if text.is_empty() { "cleared" } else { "updated" };
    ctx.toast(Toast::success(format!("{label} {verb}.")));
    Ok(())
}
