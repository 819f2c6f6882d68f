use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::data::item::{BadgeType, Item};
use crate::search_filter::Predicate;

/// Column a list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Category,
    Badge,
    Featured,
    CreationDate,
    /// Newest of creation and modification time
    Recent,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Category => "category",
            SortKey::Badge => "badge",
            SortKey::Featured => "featured",
            SortKey::CreationDate => "created",
            SortKey::Recent => "recent",
        }
    }

    fn compare(&self, a: &Item, b: &Item) -> Ordering {
        match self {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
            SortKey::Badge => a.badge_type.cmp(&b.badge_type),
            SortKey::Featured => a.featured.cmp(&b.featured),
            // Missing dates compare as oldest
            SortKey::CreationDate => a.created_at().cmp(&b.created_at()),
            SortKey::Recent => a.last_activity().cmp(&b.last_activity()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "category" => Ok(SortKey::Category),
            "badge" | "badgetype" => Ok(SortKey::Badge),
            "featured" => Ok(SortKey::Featured),
            "created" | "creationdate" | "date" => Ok(SortKey::CreationDate),
            "recent" | "default" => Ok(SortKey::Recent),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            SortOrder::Asc => "▲",
            SortOrder::Desc => "▼",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// Counters shown above the admin table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListStats {
    pub items: usize,
    pub categories: usize,
}

/// The full collection of one view plus the predicate, ordering and page
/// that decide what that view shows.
///
/// `visible` holds indices into `all_items`, in display order. It is only
/// ever rebuilt from `all_items` or reordered by `sort_by`.
///
/// Every mutating operation returns `true` when the caller should re-render.
#[derive(Debug, Clone)]
pub struct ListState {
    all_items: Vec<Item>,
    visible: Vec<usize>,
    current_page: usize,
    items_per_page: usize,
    sort: Option<(SortKey, SortOrder)>,
    predicate: Predicate,
}

impl ListState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            all_items: Vec::new(),
            visible: Vec::new(),
            current_page: 1,
            items_per_page: items_per_page.max(1),
            sort: None,
            predicate: Predicate::default(),
        }
    }

    /// Start with an active ordering (the admin table opens on newest first)
    pub fn with_sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = Some((key, order));
        self.recompute();
        self
    }

    /// Replace the whole collection, keeping predicate and ordering
    pub fn load(&mut self, items: Vec<Item>) -> bool {
        tracing::debug!(target: "list_state", "Loading {} items", items.len());
        self.all_items = items;
        self.recompute();
        self.current_page = 1;
        true
    }

    /// Set search, category and badge constraints. `None` (or an empty
    /// string) removes that constraint. Always returns to page 1.
    pub fn apply_filter(
        &mut self,
        search: Option<&str>,
        category: Option<&str>,
        badge: Option<BadgeType>,
    ) -> bool {
        let names = self.predicate.names.take();
        self.predicate = Predicate::new(search, category, badge);
        self.predicate.names = names;
        self.recompute();
        self.current_page = 1;
        tracing::debug!(
            target: "list_state",
            "Filter {:?} -> {} of {} items",
            self.predicate,
            self.visible.len(),
            self.all_items.len()
        );
        true
    }

    /// Limit the view to the given names, or lift the limit with `None`
    pub fn restrict_to_names(&mut self, names: Option<BTreeSet<String>>) -> bool {
        self.predicate.names = names;
        self.recompute();
        self.current_page = 1;
        true
    }

    pub fn clear_filters(&mut self) -> bool {
        self.predicate = Predicate::default();
        self.recompute();
        self.current_page = 1;
        true
    }

    /// Order by `key`. Without an explicit `order`, sorting by the active key
    /// flips the direction and a new key starts ascending. The sort is stable
    /// and keeps the current page.
    pub fn sort_by(&mut self, key: SortKey, order: Option<SortOrder>) -> bool {
        let order = match (order, self.sort) {
            (Some(order), _) => order,
            (None, Some((current, current_order))) if current == key => current_order.toggled(),
            (None, _) => SortOrder::Asc,
        };
        self.sort = Some((key, order));
        self.apply_sort();
        self.clamp_page();
        tracing::debug!(target: "list_state", "Sorted by {} {:?}", key, order);
        true
    }

    pub fn goto_page(&mut self, page: usize) -> bool {
        self.current_page = page.clamp(1, self.total_pages());
        true
    }

    pub fn next_page(&mut self) -> bool {
        if self.current_page >= self.total_pages() {
            return false;
        }
        self.goto_page(self.current_page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.goto_page(self.current_page - 1)
    }

    /// Replace the item with the same name in place, or prepend a new one
    pub fn upsert_item(&mut self, item: Item) -> bool {
        match self.position(&item.name) {
            Some(idx) => self.all_items[idx] = item,
            None => self.all_items.insert(0, item),
        }
        self.refresh_after_mutation();
        true
    }

    /// Replace `original_name` with `item`, which may carry a new name.
    /// Falls back to `upsert_item` when the original is gone.
    pub fn replace_item(&mut self, original_name: &str, item: Item) -> bool {
        match self.position(original_name) {
            Some(idx) => {
                self.all_items[idx] = item;
                self.refresh_after_mutation();
                true
            }
            None => self.upsert_item(item),
        }
    }

    /// Apply `edit` to the named item. Returns the item as it was before the
    /// edit so the caller can revert, or `None` when no such item exists.
    pub fn update_item<F>(&mut self, name: &str, edit: F) -> Option<Item>
    where
        F: FnOnce(&mut Item),
    {
        let idx = self.position(name)?;
        let before = self.all_items[idx].clone();
        edit(&mut self.all_items[idx]);
        self.refresh_after_mutation();
        Some(before)
    }

    /// Remove the named item. Returns its former position and the item.
    pub fn remove_item(&mut self, name: &str) -> Option<(usize, Item)> {
        let idx = self.position(name)?;
        let removed = self.all_items.remove(idx);
        self.refresh_after_mutation();
        Some((idx, removed))
    }

    /// Put a removed item back where it was
    pub fn restore_item(&mut self, index: usize, item: Item) -> bool {
        if self.position(&item.name).is_some() {
            return self.upsert_item(item);
        }
        let index = index.min(self.all_items.len());
        self.all_items.insert(index, item);
        self.refresh_after_mutation();
        true
    }

    /// The items on the current page
    pub fn current_page_slice(&self) -> Vec<&Item> {
        let start = (self.current_page - 1) * self.items_per_page;
        self.visible
            .iter()
            .skip(start)
            .take(self.items_per_page)
            .map(|&idx| &self.all_items[idx])
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(self.items_per_page).max(1)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn all_items(&self) -> &[Item] {
        &self.all_items
    }

    pub fn filtered_items(&self) -> Vec<&Item> {
        self.visible.iter().map(|&idx| &self.all_items[idx]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.all_items.iter().find(|item| item.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.all_items.iter().position(|item| item.name == name)
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn sort(&self) -> Option<(SortKey, SortOrder)> {
        self.sort
    }

    /// Page numbers to offer, centred on the current page where possible
    pub fn page_window(&self, max_visible: usize) -> RangeInclusive<usize> {
        let total = self.total_pages();
        let max_visible = max_visible.max(1);
        let mut start = self.current_page.saturating_sub(max_visible / 2).max(1);
        let end = start.saturating_add(max_visible - 1).min(total);
        if end + 1 - start < max_visible {
            start = (end + 1).saturating_sub(max_visible).max(1);
        }
        start..=end
    }

    /// First and last item number on this page and the filtered total.
    /// An empty list reports `(0, 0, 0)`.
    pub fn range_label(&self) -> (usize, usize, usize) {
        let total = self.visible.len();
        if total == 0 {
            return (0, 0, 0);
        }
        let first = (self.current_page - 1) * self.items_per_page + 1;
        let last = (self.current_page * self.items_per_page).min(total);
        (first, last, total)
    }

    pub fn stats(&self) -> ListStats {
        let categories: BTreeSet<&str> = self
            .visible
            .iter()
            .map(|&idx| self.all_items[idx].category.as_str())
            .collect();
        ListStats {
            items: self.visible.len(),
            categories: categories.len(),
        }
    }

    /// Distinct non-empty categories across the whole collection, sorted
    pub fn categories(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .all_items
            .iter()
            .map(|item| item.category.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    fn refresh_after_mutation(&mut self) {
        self.recompute();
        self.clamp_page();
    }

    fn recompute(&mut self) {
        let predicate = &self.predicate;
        self.visible = self
            .all_items
            .iter()
            .enumerate()
            .filter(|(_, item)| predicate.matches(item))
            .map(|(idx, _)| idx)
            .collect();
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        let Some((key, order)) = self.sort else {
            return;
        };
        let items = &self.all_items;
        // slice::sort_by is stable, so ties keep their previous order
        self.visible.sort_by(|&a, &b| {
            let cmp = key.compare(&items[a], &items[b]);
            match order {
                SortOrder::Asc => cmp,
                SortOrder::Desc => cmp.reverse(),
            }
        });
    }

    fn clamp_page(&mut self) {
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<Item> {
        (1..=count)
            .map(|i| Item::new(format!("App{:02}", i), "Utilities"))
            .collect()
    }

    #[test]
    fn test_page_window_centres_on_current_page() {
        let mut state = ListState::new(10);
        state.load(numbered(95));
        assert_eq!(state.page_window(5), 1..=5);

        state.goto_page(6);
        assert_eq!(state.page_window(5), 4..=8);

        state.goto_page(10);
        assert_eq!(state.page_window(5), 6..=10);
        assert_eq!(state.page_window(3), 8..=10);

        state.goto_page(1);
        assert_eq!(state.page_window(3), 1..=3);
    }

    #[test]
    fn test_page_window_with_huge_window() {
        let mut state = ListState::new(10);
        state.load(numbered(95));
        state.goto_page(7);
        assert_eq!(state.page_window(usize::MAX), 1..=10);
    }

    #[test]
    fn test_page_window_with_few_pages() {
        let mut state = ListState::new(10);
        state.load(numbered(12));
        assert_eq!(state.page_window(5), 1..=2);

        state.load(Vec::new());
        assert_eq!(state.page_window(5), 1..=1);
    }

    #[test]
    fn test_range_label() {
        let mut state = ListState::new(10);
        assert_eq!(state.range_label(), (0, 0, 0));

        state.load(numbered(25));
        state.goto_page(3);
        assert_eq!(state.range_label(), (21, 25, 25));
    }

    #[test]
    fn test_sort_toggle_and_explicit_order() {
        let mut state = ListState::new(10);
        state.load(numbered(3));

        state.sort_by(SortKey::Name, None);
        assert_eq!(state.sort(), Some((SortKey::Name, SortOrder::Asc)));
        state.sort_by(SortKey::Name, None);
        assert_eq!(state.sort(), Some((SortKey::Name, SortOrder::Desc)));
        state.sort_by(SortKey::Category, None);
        assert_eq!(state.sort(), Some((SortKey::Category, SortOrder::Asc)));
        state.sort_by(SortKey::Name, Some(SortOrder::Desc));
        assert_eq!(state.sort(), Some((SortKey::Name, SortOrder::Desc)));
        assert_eq!(state.filtered_items()[0].name, "App03");
    }

    #[test]
    fn test_stats_and_categories() {
        let mut state = ListState::new(10);
        state.load(vec![
            Item::new("A", "Music"),
            Item::new("B", "Games"),
            Item::new("C", "Music"),
            Item::new("D", ""),
        ]);
        assert_eq!(state.categories(), vec!["Games", "Music"]);
        assert_eq!(state.stats(), ListStats { items: 4, categories: 3 });

        state.apply_filter(None, Some("Music"), None);
        assert_eq!(state.stats(), ListStats { items: 2, categories: 1 });
    }

    #[test]
    fn test_update_item_returns_previous() {
        let mut state = ListState::new(10);
        state.load(numbered(2));
        let before = state
            .update_item("App02", |item| item.badge_type = BadgeType::Updated)
            .unwrap();
        assert_eq!(before.badge_type, BadgeType::None);
        assert_eq!(state.get("App02").unwrap().badge_type, BadgeType::Updated);
        assert!(state.update_item("Missing", |_| {}).is_none());
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("created".parse::<SortKey>(), Ok(SortKey::CreationDate));
        assert_eq!("Badge".parse::<SortKey>(), Ok(SortKey::Badge));
        assert!("size".parse::<SortKey>().is_err());
    }
}
