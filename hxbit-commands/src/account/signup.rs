use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_database::impls::accounts::{create_account, ensure_username_available};
use hxbit_service::SignUp;

pub const META: CommandMeta = CommandMeta {
    name: "signup",
    desc: "Create an account with email, password and username.",
    category: "account",
    usage: "!signup <email> <password> <username> [display name]",
    failure: "Failed to create account",
};

pub async fn signup(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let (Some(email), Some(password), Some(username)) =
        (args.next_word(), args.next_word(), args.next_word())
    else {
        ctx.say(usage_message(META.usage));
        return Ok(());
    };
    let display_name = args.rest();
    let data = ctx.data();

    ensure_username_available(&data.db, username).await?;

    let signed_up = data.service.sign_up(email, password).await?;
    let user_id = match &signed_up {
        SignUp::Session(session) => session.user_id(),
        SignUp::ConfirmationRequired(user) => user.id,
    };

    let account = create_account(&data.db, user_id, username, display_name).await?;

    match signed_up {
        SignUp::Session(session) => {
            data.session.set_session(session);
            ctx.toast(Toast::success(format!(
                "Welcome to HXBIT, {}!",
                account.shown_name()
            )));
        }
        SignUp::ConfirmationRequired(_) => {
            ctx.toast(Toast::info(
                "Account created. Confirm your email, then `!signin`.",
            ));
        }
    }

    Ok(())
}
