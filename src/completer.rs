use reedline::{Completer, Span, Suggestion};
use std::sync::{Arc, Mutex, PoisonError};

use catalog_console::command::COMMAND_NAMES;

/// Commands whose argument is an item name
const NAME_COMMANDS: [&str; 10] = [
    "show", "edit", "delete", "badge", "version", "link", "feature", "fav", "seo", "rm",
];
const SORT_CHOICES: [&str; 9] = [
    "name", "category", "badge", "featured", "created", "recent", "default", "name-asc",
    "name-desc",
];
const SUBCOMMANDS: [(&str, &[&str]); 5] = [
    ("bulk", &["delete", "category", "featured", "badge", "export"]),
    ("moderate", &["scan", "spam", "validate"]),
    ("report", &["overview", "insights", "categories", "quality", "export"]),
    ("cache", &["clear", "drop"]),
    ("filter", &["category", "badge"]),
];

/// Item names the completer offers, refreshed by the REPL after each command
pub type SharedNames = Arc<Mutex<Vec<String>>>;

pub struct CatalogCompleter {
    names: SharedNames,
}

impl CatalogCompleter {
    pub fn new(names: SharedNames) -> Self {
        Self { names }
    }

    fn candidates(&self, command: Option<&str>) -> Vec<String> {
        match command {
            None => COMMAND_NAMES.iter().map(|s| s.to_string()).collect(),
            Some("sort") => SORT_CHOICES.iter().map(|s| s.to_string()).collect(),
            Some("view") => vec!["admin".to_string(), "public".to_string()],
            Some("select") => {
                let mut names = self.item_names();
                names.extend(["all".to_string(), "none".to_string()]);
                names
            }
            Some(cmd) if NAME_COMMANDS.contains(&cmd) => self.item_names(),
            Some(cmd) => SUBCOMMANDS
                .iter()
                .find(|(name, _)| *name == cmd)
                .map(|(_, words)| words.iter().map(|w| w.to_string()).collect())
                .unwrap_or_default(),
        }
    }

    fn item_names(&self) -> Vec<String> {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Completer for CatalogCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let input = &line[..pos];
        let (command, partial) = match input.find(char::is_whitespace) {
            Some(idx) => (Some(&input[..idx]), input[idx..].trim_start()),
            None => (None, input),
        };
        let start = pos - partial.len();
        let needle = partial.to_lowercase();

        self.candidates(command)
            .into_iter()
            .filter(|value| value.to_lowercase().starts_with(&needle))
            .map(|value| Suggestion {
                description: None,
                extra: None,
                span: Span { start, end: pos },
                style: None,
                append_whitespace: command.is_none(),
                value,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(completer: &mut CatalogCompleter, line: &str) -> Vec<String> {
        completer
            .complete(line, line.len())
            .into_iter()
            .map(|s| s.value)
            .collect()
    }

    #[test]
    fn test_subcommands_and_names() {
        let names: SharedNames = Arc::new(Mutex::new(vec!["Logic Pro".to_string()]));
        let mut completer = CatalogCompleter::new(names);

        assert_eq!(values(&mut completer, "mod"), vec!["moderate"]);
        assert_eq!(values(&mut completer, "moderate sp"), vec!["spam"]);
        assert_eq!(values(&mut completer, "report q"), vec!["quality"]);
        assert_eq!(values(&mut completer, "select "), vec!["Logic Pro", "all", "none"]);
        assert_eq!(values(&mut completer, "show lo"), vec!["Logic Pro"]);
    }
}
