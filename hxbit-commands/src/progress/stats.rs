use crate::CommandMeta;
use crate::args::Args;
use crate::context::{Context, Error};
use hxbit_core::StatBlock;
use hxbit_database::impls::stats::get_stats;
use hxbit_utils::formatting::pluralize;

pub const META: CommandMeta = CommandMeta {
    name: "stats",
    desc: "Show your stats and unspent stat points.",
    category: "progress",
    usage: "!stats",
    failure: "Failed to load stats",
};

pub async fn stats(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<(), Error> {
    let user_id = ctx.user_id().await?;
    let block = get_stats(ctx.db(), user_id).await?;

    for line in stat_lines(&block) {
        ctx.say(line);
    }
    Ok(())
}

pub(crate) fn stat_lines(block: &StatBlock) -> Vec<String> {
    let mut lines = vec![format!(
        "{} unspent stat {} · total {}",
        block.stat_points,
        pluralize(i64::from(block.stat_points), "point", "points"),
        block.total()
    )];

    let cells: Vec<String> = block
        .iter()
        .map(|(stat, value)| format!("{:<14}{:>3}", stat.display_name(), value))
        .collect();
    lines.extend(cells.chunks(2).map(|pair| pair.join("    ")));

    lines
}

#[cfg(test)]
mod tests {
    use super::stat_lines;
    use hxbit_core::{Stat, StatBlock};

    #[test]
    fn fresh_block_renders_six_rows() {
        let lines = stat_lines(&StatBlock::default());
        assert_eq!(lines[0], "0 unspent stat points · total 12");
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1], "Strength        1    Intelligence    1");
    }

    #[test]
    fn upgraded_values_show_up() {
        let mut block = StatBlock::new(2, [1; 12]);
        assert!(block.upgrade(Stat::Teamwork));

        let lines = stat_lines(&block);
        assert_eq!(lines[0], "1 unspent stat point · total 13");
        assert!(lines[6].ends_with("Teamwork        2"));
    }
}
