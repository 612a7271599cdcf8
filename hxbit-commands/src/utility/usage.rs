use crate::args::Args;
use crate::context::{Context, Error};
use crate::utility::messages::{unknown_command_message, usage_message};
use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    desc: "Show usage syntax for a specific command.",
    category: "utility",
    usage: "!usage <command>",
    failure: "Failed to show usage",
};

pub async fn usage(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let Some(raw_name) = args.next_word() else {
        ctx.say(usage_message(META.usage));
        return Ok(());
    };

    let lookup = raw_name.trim_start_matches('!').to_ascii_lowercase();

    let Some(command) = COMMANDS.iter().find(|command| command.name == lookup) else {
        ctx.say(unknown_command_message(&lookup));
        return Ok(());
    };

    ctx.say(usage_message(command.usage));
    Ok(())
}
