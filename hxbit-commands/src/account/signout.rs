use tracing::warn;

use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;

pub const META: CommandMeta = CommandMeta {
    name: "signout",
    desc: "Sign out of the current session.",
    category: "account",
    usage: "!signout",
    failure: "Failed to sign out",
};

pub async fn signout(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let Some(session) = data.session.current() else {
        ctx.toast(Toast::info("You are not signed in."));
        return Ok(());
    };

    // The local session is dropped even when the service call fails.
    if let Err(err) = data.service.sign_out(&session).await {
        warn!(?err, user_id = %session.user_id(), "remote sign-out failed");
    }
    data.session.clear();

    ctx.toast(Toast::success("Signed out."));
    Ok(())
}
