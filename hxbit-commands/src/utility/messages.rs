use crate::CommandMeta;

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{usage}`")
}

pub fn unknown_command_message(name: &str) -> String {
    format!("Unknown command: `{name}`. Try `!help`.")
}

pub fn unknown_category_message(wanted_category: &str, valid_categories: &[&str]) -> String {
    let valid = valid_categories
        .iter()
        .map(|category| display_category(category))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Unknown category: {}\nValid categories: {}",
        display_category(wanted_category),
        valid
    )
}

pub fn no_commands_message(category: Option<&str>) -> String {
    match category {
        Some(cat) => format!("No commands found in category: {}", display_category(cat)),
        None => "No commands found at all.".to_owned(),
    }
}

pub fn page_out_of_range_message(requested_page: usize, total_pages: usize) -> String {
    format!(
        "Page {} does not exist. Available pages: 1-{}.",
        requested_page, total_pages
    )
}

pub fn page_footer(page: usize, total_pages: usize) -> String {
    format!("Page {}/{}", page.max(1), total_pages.max(1))
}

pub fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("== {} ==\n", display_category(command.category)));
            current_category = Some(command.category);
        }

        out.push_str(&format!("  {:<12} {}\n", command.name, command.desc));
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{grouped_help_description, page_footer, unknown_category_message};
    use crate::CommandMeta;

    const A: CommandMeta = CommandMeta {
        name: "feed",
        desc: "Show the feed.",
        category: "social",
        usage: "!feed",
        failure: "x",
    };
    const B: CommandMeta = CommandMeta {
        name: "stats",
        desc: "Show stats.",
        category: "progress",
        usage: "!stats",
        failure: "x",
    };

    #[test]
    fn help_groups_by_category() {
        let text = grouped_help_description(&[&B, &A]);
        assert_eq!(
            text,
            "== Progress ==\n  stats        Show stats.\n\n== Social ==\n  feed         Show the feed."
        );
        assert_eq!(grouped_help_description(&[]), "No commands available.");
    }

    #[test]
    fn unknown_category_lists_valid_ones() {
        assert_eq!(
            unknown_category_message("fun", &["account", "social"]),
            "Unknown category: Fun\nValid categories: Account, Social"
        );
    }

    #[test]
    fn footer_never_shows_page_zero() {
        assert_eq!(page_footer(0, 0), "Page 1/1");
        assert_eq!(page_footer(2, 5), "Page 2/5");
    }
}
