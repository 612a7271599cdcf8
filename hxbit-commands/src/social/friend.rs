use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_database::impls::social::{
    incoming_friend_requests, respond_friend_request, send_friend_request,
};
use hxbit_utils::time::{format_relative_age, now_unix_secs};

pub const META: CommandMeta = CommandMeta {
    name: "friend",
    desc: "Send, accept, decline or list friend requests.",
    category: "social",
    usage: "!friend <add|accept|decline|list> [username|request id]",
    failure: "Failed to update friend requests",
};

pub async fn friend(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let action = args.next_word().map(str::to_ascii_lowercase);
    if !matches!(
        action.as_deref(),
        Some("add" | "accept" | "decline" | "list")
    ) {
        ctx.say(usage_message(META.usage));
        return Ok(());
    }

    let user_id = ctx.user_id().await?;
    let db = ctx.db();

    match action.as_deref() {
        Some("add") => {
            let Some(username) = args.next_word() else {
                ctx.say(usage_message("!friend add <username>"));
                return Ok(());
            };
            let Some(target_id) = ctx.lookup_user(username).await? else {
                return Ok(());
            };

            match send_friend_request(db, user_id, target_id).await? {
                Some(_) => ctx.toast(Toast::success(format!("Friend request sent to {username}."))),
                None => ctx.toast(Toast::info(format!(
                    "A friend request with {username} is already pending."
                ))),
            }
        }
        Some(action @ ("accept" | "decline")) => {
            let accept = action == "accept";
            let Some(request_id) = args.next_parsed::<u64>() else {
                ctx.say(usage_message(if accept {
                    "!friend accept <request id>"
                } else {
                    "!friend decline <request id>"
                }));
                return Ok(());
            };

            if !respond_friend_request(db, user_id, request_id, accept).await? {
                ctx.say(format!("No pending friend request #{request_id}."));
            } else if accept {
                ctx.toast(Toast::success("Friend request accepted. You now follow each other."));
            } else {
                ctx.toast(Toast::success("Friend request declined."));
            }
        }
        _ => {
            let requests = incoming_friend_requests(db, user_id).await?;
            if requests.is_empty() {
                ctx.say("No pending friend requests.");
            }
            let now = now_unix_secs();
            for request in &requests {
                ctx.say(format!(
                    "#{} from {} · {}",
                    request.id,
                    request.sender_username,
                    format_relative_age(request.created_at, now)
                ));
            }
        }
    }

    Ok(())
}
