use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::BTreeSet;

use crate::data::item::{BadgeType, Item};

/// The combination of constraints that decides which items are visible
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    /// Free text, matched case-insensitively against name, category and description
    pub search_term: String,
    /// Exact, case-sensitive category
    pub category: Option<String>,
    pub badge: Option<BadgeType>,
    /// Allow-list of names (the public favorites view)
    pub names: Option<BTreeSet<String>>,
}

impl Predicate {
    pub fn new(search: Option<&str>, category: Option<&str>, badge: Option<BadgeType>) -> Self {
        Self {
            search_term: search.unwrap_or_default().to_string(),
            category: category.filter(|c| !c.is_empty()).map(str::to_string),
            badge,
            names: None,
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.search_term.is_empty()
            && self.category.is_none()
            && self.badge.is_none()
            && self.names.is_none()
    }

    pub fn matches(&self, item: &Item) -> bool {
        SearchFilter::matches_search(item, &self.search_term)
            && SearchFilter::matches_category(item, self.category.as_deref())
            && self.badge.map_or(true, |b| item.badge_type == b)
            && self
                .names
                .as_ref()
                .map_or(true, |names| names.contains(&item.name))
    }
}

/// Handles search and filter operations on catalog items
pub struct SearchFilter;

impl SearchFilter {
    /// Empty term matches everything, otherwise a lowercase substring test on
    /// name, category or description
    pub fn matches_search(item: &Item, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();

        item.name.to_lowercase().contains(&needle)
            || item.category.to_lowercase().contains(&needle)
            || item
                .description
                .as_deref()
                .map_or(false, |d| d.to_lowercase().contains(&needle))
    }

    pub fn matches_category(item: &Item, category: Option<&str>) -> bool {
        match category {
            None | Some("") => true,
            Some(c) => item.category == c,
        }
    }

    /// Items whose names fuzzily resemble `name`, best first.
    /// The item called exactly `name` is left out.
    pub fn similar_items<'a>(items: &'a [Item], name: &str, limit: usize) -> Vec<(i64, &'a Item)> {
        let matcher = SkimMatcherV2::default().ignore_case();
        let mut scored: Vec<(i64, &Item)> = items
            .iter()
            .filter(|item| item.name != name)
            .filter_map(|item| {
                // Score both directions so short queries and short names both hit
                let forward = matcher.fuzzy_match(&item.name, name);
                let backward = matcher.fuzzy_match(name, &item.name);
                forward.max(backward).map(|score| (score, item))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(limit);
        scored
    }

    /// Categories from `known` that fuzzily match `text`, best first
    pub fn suggest_categories(known: &[String], text: &str, limit: usize) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let matcher = SkimMatcherV2::default().ignore_case();
        let mut scored: Vec<(i64, &String)> = known
            .iter()
            .filter_map(|c| matcher.fuzzy_match(c, text.trim()).map(|s| (s, c)))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored.into_iter().take(limit).map(|(_, c)| c.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Item> {
        vec![
            Item::new("DaVinci Resolve", "Fotoğraf ve Video")
                .with_description("Professional video editing"),
            Item::new("Visual Studio Code", "Geliştirici Araçları"),
            Item::new("Logic Pro", "Müzik"),
        ]
    }

    #[test]
    fn test_search_hits_description_case_insensitively() {
        let items = sample();
        assert!(SearchFilter::matches_search(&items[0], "VIDEO"));
        assert!(SearchFilter::matches_search(&items[1], "studio"));
        assert!(!SearchFilter::matches_search(&items[2], "video"));
        assert!(SearchFilter::matches_search(&items[2], ""));
    }

    #[test]
    fn test_category_is_exact() {
        let items = sample();
        assert!(SearchFilter::matches_category(&items[2], Some("Müzik")));
        assert!(!SearchFilter::matches_category(&items[2], Some("müzik")));
        assert!(SearchFilter::matches_category(&items[2], Some("")));
    }

    #[test]
    fn test_predicate_combines_constraints() {
        let items = sample();
        let mut predicate = Predicate::new(Some("o"), None, Some(BadgeType::None));
        assert!(items.iter().all(|i| predicate.matches(i)));

        predicate.names = Some(["Logic Pro".to_string()].into_iter().collect());
        let visible: Vec<_> = items.iter().filter(|i| predicate.matches(i)).collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Logic Pro");
    }

    #[test]
    fn test_similar_items_skips_self() {
        let mut items = sample();
        items.push(Item::new("Logic Pro X", "Müzik"));
        let similar = SearchFilter::similar_items(&items, "Logic Pro", 3);
        assert!(!similar.is_empty());
        assert_eq!(similar[0].1.name, "Logic Pro X");
        assert!(similar.iter().all(|(_, i)| i.name != "Logic Pro"));
    }
}
