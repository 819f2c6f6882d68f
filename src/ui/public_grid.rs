use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

use super::{filter_summary, pager, range_line, RenderOptions};
use crate::data::item::{BadgeType, Item};
use crate::data::list_state::{ListState, SortKey, SortOrder};
use crate::preferences::Preferences;

const CARDS_PER_ROW: usize = 3;
const MAX_FEATURED: usize = 10;

/// Choices of the public sort selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicSort {
    Default,
    NameAsc,
    NameDesc,
}

impl PublicSort {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Some(PublicSort::Default),
            "name-asc" => Some(PublicSort::NameAsc),
            "name-desc" => Some(PublicSort::NameDesc),
            _ => None,
        }
    }

    /// Explicit key and order for `ListState::sort_by`
    pub fn key_and_order(self) -> (SortKey, SortOrder) {
        match self {
            PublicSort::Default => (SortKey::Recent, SortOrder::Desc),
            PublicSort::NameAsc => (SortKey::Name, SortOrder::Asc),
            PublicSort::NameDesc => (SortKey::Name, SortOrder::Desc),
        }
    }
}

fn card(item: &Item, favorite: bool, options: &RenderOptions) -> String {
    let mut title = item.name.clone();
    if favorite {
        title.push_str(" ♥");
    }
    let mut lines = vec![options.bold(&title), item.category.clone()];

    let mut meta = Vec::new();
    match item.badge_type {
        BadgeType::None => {}
        badge => meta.push(options.paint(badge.label(), options.accent())),
    }
    if let Some(version) = &item.version {
        meta.push(format!("v{}", version));
    }
    if let Some(size) = &item.file_size {
        meta.push(size.clone());
    }
    if !meta.is_empty() {
        lines.push(meta.join(" · "));
    }
    lines.join("\n")
}

/// Featured apps for the strip above the grid, in display order. Only the
/// unfiltered first page shows it.
pub fn featured_strip(state: &ListState) -> Vec<&Item> {
    if state.current_page() != 1 || !state.predicate().is_unconstrained() {
        return Vec::new();
    }
    state
        .filtered_items()
        .into_iter()
        .filter(|item| item.featured)
        .take(MAX_FEATURED)
        .collect()
}

/// The current page of the public view as a grid of cards
pub fn render(state: &ListState, preferences: &Preferences, options: &RenderOptions) -> String {
    let mut out = Vec::new();
    let featured = featured_strip(state);
    if !featured.is_empty() {
        let names: Vec<&str> = featured.iter().map(|item| item.name.as_str()).collect();
        out.push(format!(
            "{} {}",
            options.paint("★ Featured:", options.accent()),
            names.join(" · ")
        ));
    }
    if let Some(summary) = filter_summary(state) {
        out.push(summary);
    }

    let page = state.current_page_slice();
    if page.is_empty() {
        let message = if state.predicate().names.is_some() {
            "No favorites yet."
        } else {
            "No apps found."
        };
        out.push(message.to_string());
        return out.join("\n");
    }

    let mut table = Table::new();
    if !options.use_color {
        table.force_no_tty();
    }
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for chunk in page.chunks(CARDS_PER_ROW) {
        let cells: Vec<Cell> = chunk
            .iter()
            .map(|item| Cell::new(card(item, preferences.is_favorite(&item.name), options)))
            .collect();
        table.add_row(cells);
    }

    out.push(table.to_string());
    out.push(format!("{}    {}", range_line(state), pager(state, options)));
    out.join("\n")
}
