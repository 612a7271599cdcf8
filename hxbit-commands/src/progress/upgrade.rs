use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use crate::notice::Toast;
use crate::utility::messages::usage_message;
use hxbit_core::Stat;
use hxbit_database::impls::stats::{StatUpgrade, upgrade_stat};

pub const META: CommandMeta = CommandMeta {
    name: "upgrade",
    desc: "Spend one stat point on a stat.",
    category: "progress",
    usage: "!upgrade <stat>",
    failure: "Failed to upgrade stat",
};

pub async fn upgrade(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let Some(raw_stat) = args.next_word() else {
        ctx.say(usage_message(META.usage));
        let names = Stat::ALL.map(Stat::column).join(", ");
        ctx.say(format!("Stats: {names}"));
        return Ok(());
    };
    let stat = raw_stat.parse::<Stat>()?;

    let user_id = ctx.user_id().await?;
    match upgrade_stat(ctx.db(), user_id, stat).await? {
        StatUpgrade::Applied(block) => ctx.toast(Toast::success(format!(
            "{stat} is now {}. {} points left.",
            block.get(stat),
            block.stat_points
        ))),
        StatUpgrade::NoPoints(_) => {
            ctx.toast(Toast::info("No stat points to spend. Complete tasks to earn more."));
        }
    }

    Ok(())
}
