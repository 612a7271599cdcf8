use crate::args::Args;
use crate::context::{Context, Error};
use crate::utility::messages::{
    grouped_help_description, no_commands_message, page_footer, page_out_of_range_message,
    unknown_category_message,
};
use crate::{COMMANDS, CommandMeta};
use hxbit_utils::pagination::{page_slice, total_pages};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help [page|category]",
    failure: "Failed to show help",
};

const HELP_COMMANDS_PER_PAGE: usize = 20;

pub async fn help(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<(), Error> {
    let query = args.next_word();
    let parsed_page = query.and_then(|raw| raw.parse::<usize>().ok().filter(|page| *page >= 1));
    let category = match (query, parsed_page) {
        (Some(raw), None) => Some(raw.to_ascii_lowercase()),
        _ => None,
    };
    let category = category.as_deref();

    let mut categories: Vec<&str> = COMMANDS.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();

    if let Some(wanted_category) = category
        && !categories.contains(&wanted_category)
    {
        ctx.say(unknown_category_message(wanted_category, &categories));
        return Ok(());
    }

    let commands = sorted_commands(category);
    if commands.is_empty() {
        ctx.say(no_commands_message(category));
        return Ok(());
    }

    let requested_page = parsed_page.unwrap_or(1);
    let total = total_pages(commands.len(), HELP_COMMANDS_PER_PAGE);

    if requested_page > total {
        ctx.say(page_out_of_range_message(requested_page, total));
        return Ok(());
    }

    let page = page_slice(&commands, HELP_COMMANDS_PER_PAGE, requested_page);
    ctx.say("Available Commands");
    ctx.say(grouped_help_description(page));
    if total > 1 {
        ctx.say(page_footer(requested_page, total));
    }
    Ok(())
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| match category {
            Some(wanted) => cmd.category == wanted,
            None => true,
        })
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}

#[cfg(test)]
mod tests {
    use super::sorted_commands;
    use crate::COMMANDS;

    #[test]
    fn all_commands_are_listed_in_category_order() {
        let sorted = sorted_commands(None);
        assert_eq!(sorted.len(), COMMANDS.len());
        assert!(
            sorted
                .windows(2)
                .all(|pair| (pair[0].category, pair[0].name) <= (pair[1].category, pair[1].name))
        );
    }

    #[test]
    fn category_filter() {
        let social = sorted_commands(Some("social"));
        assert!(!social.is_empty());
        assert!(social.iter().all(|cmd| cmd.category == "social"));
        assert!(sorted_commands(Some("games")).is_empty());
    }
}
