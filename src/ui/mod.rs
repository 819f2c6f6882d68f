//! Terminal renderers for the two list views.
//!
//! Renderers only read a `ListState` and return text; they never change it.

pub mod admin_table;
pub mod public_grid;
pub mod reports;

use crossterm::style::{Color, Stylize};

use crate::data::list_state::ListState;
use crate::preferences::Theme;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub use_color: bool,
    pub theme: Theme,
    /// Page numbers shown around the current one
    pub page_window: usize,
    pub show_seo_score: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            use_color: true,
            theme: Theme::Light,
            page_window: 5,
            show_seo_score: false,
        }
    }
}

impl RenderOptions {
    pub fn accent(&self) -> Color {
        match self.theme {
            Theme::Light => Color::Blue,
            Theme::Dark => Color::Cyan,
        }
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.use_color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.use_color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// `Showing 21-25 of 25` or `No items`
pub fn range_line(state: &ListState) -> String {
    match state.range_label() {
        (_, _, 0) => "No items".to_string(),
        (first, last, total) => format!("Showing {}-{} of {}", first, last, total),
    }
}

/// `< 1 2 [3] 4 5 >`; the arrows only appear when there is somewhere to go
pub fn pager(state: &ListState, options: &RenderOptions) -> String {
    let current = state.current_page();
    let total = state.total_pages();
    let mut parts = Vec::new();

    if current > 1 {
        parts.push("<".to_string());
    }
    let window = state.page_window(options.page_window);
    if *window.start() > 1 {
        parts.push("1".to_string());
        if *window.start() > 2 {
            parts.push("...".to_string());
        }
    }
    for page in window.clone() {
        if page == current {
            parts.push(options.paint(&format!("[{}]", page), options.accent()));
        } else {
            parts.push(page.to_string());
        }
    }
    if *window.end() < total {
        if *window.end() + 1 < total {
            parts.push("...".to_string());
        }
        parts.push(total.to_string());
    }
    if current < total {
        parts.push(">".to_string());
    }

    parts.join(" ")
}

/// Active constraints of a view, or `None` when it shows everything
pub fn filter_summary(state: &ListState) -> Option<String> {
    let predicate = state.predicate();
    if predicate.is_unconstrained() {
        return None;
    }
    let mut parts = Vec::new();
    if !predicate.search_term.is_empty() {
        parts.push(format!("search \"{}\"", predicate.search_term));
    }
    if let Some(category) = &predicate.category {
        parts.push(format!("category {}", category));
    }
    if let Some(badge) = predicate.badge {
        parts.push(format!("badge {}", badge));
    }
    if predicate.names.is_some() {
        parts.push("favorites".to_string());
    }
    Some(format!("Filtered by {}", parts.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::item::Item;

    fn state(count: usize, per_page: usize) -> ListState {
        let mut state = ListState::new(per_page);
        state.load(
            (1..=count)
                .map(|i| Item::new(format!("App{:02}", i), "Utilities"))
                .collect(),
        );
        state
    }

    #[test]
    fn test_pager_plain() {
        let options = RenderOptions {
            use_color: false,
            ..RenderOptions::default()
        };
        let mut s = state(95, 10);
        assert_eq!(pager(&s, &options), "[1] 2 3 4 5 ... 10 >");

        s.goto_page(6);
        assert_eq!(pager(&s, &options), "< 1 ... 4 5 [6] 7 8 ... 10 >");

        s.goto_page(10);
        assert_eq!(pager(&s, &options), "< 1 ... 6 7 8 9 [10]");
    }

    #[test]
    fn test_range_line_and_summary() {
        let mut s = state(25, 10);
        s.goto_page(3);
        assert_eq!(range_line(&s), "Showing 21-25 of 25");
        assert!(filter_summary(&s).is_none());

        s.apply_filter(Some("app0"), None, None);
        assert_eq!(filter_summary(&s).unwrap(), "Filtered by search \"app0\"");
        assert_eq!(range_line(&ListState::new(10)), "No items");
    }
}
