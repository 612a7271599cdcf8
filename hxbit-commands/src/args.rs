use std::str::FromStr;

/// Whitespace-separated arguments of a command line, consumed left to right.
#[derive(Clone, Copy, Debug)]
pub struct Args<'a> {
    remaining: &'a str,
}

impl<'a> Args<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            remaining: raw.trim(),
        }
    }

    pub fn next_word(&mut self) -> Option<&'a str> {
        let trimmed = self.remaining.trim_start();
        if trimmed.is_empty() {
            self.remaining = trimmed;
            return None;
        }

        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (word, rest) = trimmed.split_at(end);
        self.remaining = rest;
        Some(word)
    }

    pub fn peek_word(&self) -> Option<&'a str> {
        let mut copy = *self;
        copy.next_word()
    }

    /// Parse the next word, leaving the arguments untouched when it does not parse.
    pub fn next_parsed<T: FromStr>(&mut self) -> Option<T> {
        let value = self.peek_word()?.parse().ok()?;
        self.next_word();
        Some(value)
    }

    /// Everything left, trimmed; `None` when empty.
    pub fn rest(&mut self) -> Option<&'a str> {
        let rest = self.remaining.trim();
        self.remaining = "";
        (!rest.is_empty()).then_some(rest)
    }
}

/// Split `text` on `|` into trimmed fields, keeping empty ones as `None`.
pub fn split_fields(text: &str) -> Vec<Option<&str>> {
    text.split('|')
        .map(str::trim)
        .map(|field| (!field.is_empty()).then_some(field))
        .collect()
}

/// Split a console line into a command name and its raw arguments.
pub fn split_command(line: &str, prefix: char) -> Option<(String, &str)> {
    let body = line.trim().strip_prefix(prefix)?;
    let end = body.find(char::is_whitespace).unwrap_or(body.len());
    let (name, rest) = body.split_at(end);
    if name.is_empty() {
        return None;
    }
    Some((name.to_ascii_lowercase(), rest.trim()))
}

#[cfg(test)]
mod tests {
    use super::{Args, split_command, split_fields};

    #[test]
    fn words_then_rest() {
        let mut args = Args::new("  add 12   Morning run  ");
        assert_eq!(args.next_word(), Some("add"));
        assert_eq!(args.next_parsed::<u64>(), Some(12));
        assert_eq!(args.rest(), Some("Morning run"));
        assert_eq!(args.next_word(), None);
        assert_eq!(args.rest(), None);
    }

    #[test]
    fn failed_parse_keeps_the_word() {
        let mut args = Args::new("abc def");
        assert_eq!(args.next_parsed::<u64>(), None);
        assert_eq!(args.next_word(), Some("abc"));
    }

    #[test]
    fn fields_split_on_pipes() {
        assert_eq!(
            split_fields("Hackathon | | 2026-11-02"),
            vec![Some("Hackathon"), None, Some("2026-11-02")]
        );
        assert_eq!(split_fields("solo"), vec![Some("solo")]);
    }

    #[test]
    fn commands_need_the_prefix_and_a_name() {
        assert_eq!(
            split_command("!Complete 42", '!'),
            Some(("complete".to_owned(), "42"))
        );
        assert_eq!(split_command("  !help  ", '!'), Some(("help".to_owned(), "")));
        assert_eq!(split_command("help", '!'), None);
        assert_eq!(split_command("! help", '!'), None);
    }
}
