//! Parsing of console input lines into commands.

use std::path::PathBuf;

use crate::config::config::ViewKind;
use crate::data::item::BadgeType;
use crate::data::list_state::{SortKey, SortOrder};
use crate::moderation::Check;
use crate::ui::public_grid::PublicSort;

/// Every command word, for help and completion
pub const COMMAND_NAMES: [&str; 35] = [
    "list", "page", "next", "prev", "search", "type", "filter", "clear", "sort", "view", "show",
    "add", "edit", "delete", "badge", "version", "link", "feature", "fav", "favorites", "scrape",
    "seo", "categories", "export", "select", "bulk", "moderate", "report", "theme", "refresh",
    "cache", "log", "help", "quit", "exit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectTarget {
    /// List the selection
    Show,
    /// Toggle one item
    Name(String),
    /// Everything the active view's filters let through
    Visible,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    Delete,
    Category(String),
    Featured,
    Badge(BadgeType),
    Export(Option<PathBuf>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerateAction {
    /// Every check over the whole catalog
    Report,
    Only(Check),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    Overview,
    Insights,
    Categories,
    Quality,
    Export(Option<PathBuf>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    Stats,
    Clear,
    Drop(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Page(usize),
    Next,
    Prev,
    /// Applied at once
    Search(String),
    /// Applied after the debounce delay
    Type(String),
    FilterCategory(Option<String>),
    FilterBadge(Option<BadgeType>),
    Clear,
    Sort {
        key: SortKey,
        order: Option<SortOrder>,
    },
    View(ViewKind),
    Show(String),
    Add,
    Edit(String),
    Delete(String),
    Badge {
        name: String,
        badge: BadgeType,
    },
    Version {
        name: String,
        version: String,
    },
    Link {
        name: String,
        url: String,
    },
    Feature(String),
    Fav(String),
    /// `None` flips the favorites-only view
    Favorites(Option<bool>),
    Scrape(String),
    Seo(String),
    Categories,
    Export(Option<PathBuf>),
    Select(SelectTarget),
    Bulk(BulkAction),
    Moderate(ModerateAction),
    Report(ReportKind),
    Theme,
    Refresh,
    Cache(CacheAction),
    Log(usize),
    Help,
    Quit,
}

fn required(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(rest.to_string())
    }
}

/// Split `NAME VALUE` on the last space; names may contain spaces
fn name_and_last(rest: &str, usage: &str) -> Result<(String, String), String> {
    match rest.rsplit_once(char::is_whitespace) {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Usage: {}", usage)),
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "list" | "ls" => Ok(Command::List),
            "page" => rest
                .parse()
                .map(Command::Page)
                .map_err(|_| "Usage: page N".to_string()),
            "next" | "n" => Ok(Command::Next),
            "prev" | "p" => Ok(Command::Prev),
            "search" => Ok(Command::Search(rest.to_string())),
            "type" => Ok(Command::Type(rest.to_string())),
            "filter" => Self::parse_filter(rest),
            "clear" => Ok(Command::Clear),
            "sort" => Self::parse_sort(rest),
            "view" => rest.parse().map(Command::View),
            "show" => required(rest, "show NAME").map(Command::Show),
            "add" => Ok(Command::Add),
            "edit" => required(rest, "edit NAME").map(Command::Edit),
            "delete" | "rm" => required(rest, "delete NAME").map(Command::Delete),
            "badge" => {
                let (name, badge) = name_and_last(rest, "badge NAME none|new|updated")?;
                Ok(Command::Badge {
                    name,
                    badge: badge.parse::<BadgeType>()?,
                })
            }
            "version" => {
                let (name, version) = name_and_last(rest, "version NAME VERSION")?;
                Ok(Command::Version { name, version })
            }
            "link" => {
                let (name, url) = name_and_last(rest, "link NAME URL")?;
                Ok(Command::Link { name, url })
            }
            "feature" => required(rest, "feature NAME").map(Command::Feature),
            "fav" => required(rest, "fav NAME").map(Command::Fav),
            "favorites" => match rest {
                "" => Ok(Command::Favorites(None)),
                "on" => Ok(Command::Favorites(Some(true))),
                "off" => Ok(Command::Favorites(Some(false))),
                _ => Err("Usage: favorites [on|off]".to_string()),
            },
            "scrape" => required(rest, "scrape URL").map(Command::Scrape),
            "seo" => required(rest, "seo NAME").map(Command::Seo),
            "categories" => Ok(Command::Categories),
            "export" => Ok(Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest)))),
            "select" => Ok(Command::Select(match rest {
                "" => SelectTarget::Show,
                "all" => SelectTarget::Visible,
                "none" => SelectTarget::None,
                name => SelectTarget::Name(name.to_string()),
            })),
            "bulk" => Self::parse_bulk(rest),
            "moderate" => match rest {
                "" => Ok(Command::Moderate(ModerateAction::Report)),
                check => check
                    .parse()
                    .map(|c| Command::Moderate(ModerateAction::Only(c)))
                    .map_err(|_| "Usage: moderate [scan|spam|validate]".to_string()),
            },
            "report" => Self::parse_report(rest),
            "theme" => Ok(Command::Theme),
            "refresh" => Ok(Command::Refresh),
            "cache" => match rest.split_once(char::is_whitespace) {
                _ if rest.is_empty() => Ok(Command::Cache(CacheAction::Stats)),
                _ if rest == "clear" => Ok(Command::Cache(CacheAction::Clear)),
                Some(("drop", id)) => id
                    .trim()
                    .parse()
                    .map(|id| Command::Cache(CacheAction::Drop(id)))
                    .map_err(|_| "Usage: cache drop ID".to_string()),
                _ => Err("Usage: cache [clear | drop ID]".to_string()),
            },
            "log" => match rest {
                "" => Ok(Command::Log(20)),
                n => n
                    .parse()
                    .map(Command::Log)
                    .map_err(|_| "Usage: log [COUNT]".to_string()),
            },
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("Unknown command '{}'. Type 'help' for a list.", other)),
        }
    }

    fn parse_filter(rest: &str) -> Result<Self, String> {
        let (what, value) = match rest.split_once(char::is_whitespace) {
            Some((what, value)) => (what, value.trim()),
            None => (rest, ""),
        };
        match what {
            "category" => Ok(Command::FilterCategory(
                (!value.is_empty()).then(|| value.to_string()),
            )),
            "badge" => match value {
                "" | "all" => Ok(Command::FilterBadge(None)),
                badge => badge.parse().map(|b| Command::FilterBadge(Some(b))),
            },
            _ => Err("Usage: filter category [NAME] | filter badge [none|new|updated]".to_string()),
        }
    }

    fn parse_bulk(rest: &str) -> Result<Self, String> {
        const USAGE: &str = "Usage: bulk delete | category NAME | featured | badge none|new|updated | export [FILE]";
        let (what, value) = match rest.split_once(char::is_whitespace) {
            Some((what, value)) => (what, value.trim()),
            None => (rest, ""),
        };
        let action = match what {
            "delete" => BulkAction::Delete,
            "category" if !value.is_empty() => BulkAction::Category(value.to_string()),
            "featured" | "feature" => BulkAction::Featured,
            "badge" if !value.is_empty() => BulkAction::Badge(value.parse()?),
            "export" => BulkAction::Export((!value.is_empty()).then(|| PathBuf::from(value))),
            _ => return Err(USAGE.to_string()),
        };
        Ok(Command::Bulk(action))
    }

    fn parse_report(rest: &str) -> Result<Self, String> {
        let (what, value) = match rest.split_once(char::is_whitespace) {
            Some((what, value)) => (what, value.trim()),
            None => (rest, ""),
        };
        let kind = match what {
            "" | "overview" => ReportKind::Overview,
            "insights" => ReportKind::Insights,
            "categories" => ReportKind::Categories,
            "quality" => ReportKind::Quality,
            "export" => ReportKind::Export((!value.is_empty()).then(|| PathBuf::from(value))),
            _ => {
                return Err(
                    "Usage: report [overview|insights|categories|quality|export [FILE]]"
                        .to_string(),
                )
            }
        };
        Ok(Command::Report(kind))
    }

    fn parse_sort(rest: &str) -> Result<Self, String> {
        if let Some(choice) = PublicSort::parse(rest) {
            let (key, order) = choice.key_and_order();
            return Ok(Command::Sort {
                key,
                order: Some(order),
            });
        }
        let mut parts = rest.split_whitespace();
        let key = parts
            .next()
            .ok_or_else(|| "Usage: sort KEY [asc|desc]".to_string())?
            .parse::<SortKey>()?;
        let order = parts.next().map(str::parse::<SortOrder>).transpose()?;
        Ok(Command::Sort { key, order })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_with_spaces() {
        assert_eq!(
            Command::parse("badge Logic Pro updated"),
            Ok(Command::Badge {
                name: "Logic Pro".to_string(),
                badge: BadgeType::Updated
            })
        );
        assert_eq!(
            Command::parse("delete  Visual Studio Code "),
            Ok(Command::Delete("Visual Studio Code".to_string()))
        );
        assert!(Command::parse("version 1.0").is_err());
    }

    #[test]
    fn test_sort_forms() {
        assert_eq!(
            Command::parse("sort name"),
            Ok(Command::Sort {
                key: SortKey::Name,
                order: None
            })
        );
        assert_eq!(
            Command::parse("sort created desc"),
            Ok(Command::Sort {
                key: SortKey::CreationDate,
                order: Some(SortOrder::Desc)
            })
        );
        assert_eq!(
            Command::parse("sort name-desc"),
            Ok(Command::Sort {
                key: SortKey::Name,
                order: Some(SortOrder::Desc)
            })
        );
        assert!(Command::parse("sort").is_err());
    }

    #[test]
    fn test_filters_and_misc() {
        assert_eq!(
            Command::parse("filter category Grafik ve Tasarım"),
            Ok(Command::FilterCategory(Some("Grafik ve Tasarım".to_string())))
        );
        assert_eq!(Command::parse("filter category"), Ok(Command::FilterCategory(None)));
        assert_eq!(
            Command::parse("filter badge new"),
            Ok(Command::FilterBadge(Some(BadgeType::New)))
        );
        assert_eq!(Command::parse("page 3"), Ok(Command::Page(3)));
        assert_eq!(Command::parse("view public"), Ok(Command::View(ViewKind::Public)));
        assert_eq!(Command::parse("search"), Ok(Command::Search(String::new())));
        assert_eq!(Command::parse("export"), Ok(Command::Export(None)));
        assert!(Command::parse("frobnicate").is_err());
    }

    #[test]
    fn test_selection_and_bulk() {
        assert_eq!(
            Command::parse("select Logic Pro"),
            Ok(Command::Select(SelectTarget::Name("Logic Pro".to_string())))
        );
        assert_eq!(Command::parse("select all"), Ok(Command::Select(SelectTarget::Visible)));
        assert_eq!(Command::parse("select"), Ok(Command::Select(SelectTarget::Show)));
        assert_eq!(
            Command::parse("bulk category Grafik ve Tasarım"),
            Ok(Command::Bulk(BulkAction::Category("Grafik ve Tasarım".to_string())))
        );
        assert_eq!(
            Command::parse("bulk badge new"),
            Ok(Command::Bulk(BulkAction::Badge(BadgeType::New)))
        );
        assert_eq!(
            Command::parse("bulk export picked.json"),
            Ok(Command::Bulk(BulkAction::Export(Some(PathBuf::from("picked.json")))))
        );
        assert!(Command::parse("bulk category").is_err());
        assert!(Command::parse("bulk").is_err());
    }

    #[test]
    fn test_moderation_report_and_cache() {
        assert_eq!(
            Command::parse("moderate"),
            Ok(Command::Moderate(ModerateAction::Report))
        );
        assert_eq!(
            Command::parse("moderate spam"),
            Ok(Command::Moderate(ModerateAction::Only(Check::Spam)))
        );
        assert!(Command::parse("moderate everything").is_err());
        assert_eq!(Command::parse("report"), Ok(Command::Report(ReportKind::Overview)));
        assert_eq!(
            Command::parse("report quality"),
            Ok(Command::Report(ReportKind::Quality))
        );
        assert_eq!(Command::parse("cache"), Ok(Command::Cache(CacheAction::Stats)));
        assert_eq!(Command::parse("cache clear"), Ok(Command::Cache(CacheAction::Clear)));
        assert_eq!(
            Command::parse("cache drop 3"),
            Ok(Command::Cache(CacheAction::Drop(3)))
        );
        assert!(Command::parse("cache drop x").is_err());
    }
}
