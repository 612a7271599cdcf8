use tracing::warn;

use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_database::impls::accounts::get_account;

pub const META: CommandMeta = CommandMeta {
    name: "signin",
    desc: "Sign in with email and password.",
    category: "account",
    usage: "!signin <email> <password>",
    failure: "Failed to sign in",
};

pub async fn signin(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let (Some(email), Some(password)) = (args.next_word(), args.next_word()) else {
        ctx.say(usage_message(META.usage));
        return Ok(());
    };
    let data = ctx.data();

    let session = data.service.sign_in_with_password(email, password).await?;
    let user_id = session.user_id();
    data.session.set_session(session);

    match get_account(&data.db, user_id).await? {
        Some(account) => ctx.toast(Toast::success(format!(
            "Welcome back, {}! You are level {}.",
            account.shown_name(),
            account.level
        ))),
        None => {
            warn!(%user_id, "signed in without an account row");
            ctx.toast(Toast::info("Signed in, but no profile exists for this login."));
        }
    }

    Ok(())
}
