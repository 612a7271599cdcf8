use std::path::Path;

use anyhow::Context as _;

use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_database::impls::accounts::set_avatar_url;
use hxbit_service::storage::image_content_type;

pub const META: CommandMeta = CommandMeta {
    name: "avatar",
    desc: "Upload a profile image (png, jpg, webp or gif).",
    category: "account",
    usage: "!avatar <image path>",
    failure: "Failed to upload avatar",
};

pub async fn avatar(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let Some(raw_path) = args.rest() else {
        ctx.say(usage_message(META.usage));
        return Ok(());
    };

    let path = Path::new(raw_path);
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(raw_path);

    if image_content_type(file_name).is_none() {
        ctx.toast(Toast::error("Please choose a png, jpg, webp or gif image."));
        return Ok(());
    }

    let session = ctx.session().await?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read avatar file {}", path.display()))?;

    let url = ctx
        .data()
        .service
        .upload_avatar(&session, file_name, bytes)
        .await?;
    set_avatar_url(ctx.db(), session.user_id(), &url).await?;

    ctx.toast(Toast::success("Profile picture updated."));
    ctx.say(url);
    Ok(())
}
