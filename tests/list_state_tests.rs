#[cfg(test)]
mod tests {
    use catalog_console::data::item::{BadgeType, Item};
    use catalog_console::data::list_state::{ListState, SortKey, SortOrder};
    use catalog_console::search_filter::SearchFilter;

    fn numbered(count: usize) -> Vec<Item> {
        (1..=count)
            .map(|i| Item::new(format!("App{:02}", i), "Utilities"))
            .collect()
    }

    fn names(items: &[&Item]) -> Vec<String> {
        items.iter().map(|item| item.name.clone()).collect()
    }

    fn mixed_catalog() -> Vec<Item> {
        vec![
            Item::new("IINA", "Video ve Müzik").with_badge(BadgeType::New),
            Item::new("Sketch", "Grafik ve Tasarım").with_description("Vector design tool"),
            Item::new("HandBrake", "video araçları").with_badge(BadgeType::Updated),
            Item::new("Rectangle", "Verimlilik"),
            Item::new("Logic Pro", "Müzik").with_badge(BadgeType::New),
            Item::new("Raycast", "Verimlilik").with_description("Launcher"),
        ]
    }

    #[test]
    fn test_third_page_of_twenty_five() {
        let mut state = ListState::new(10);
        state.load(numbered(25));

        state.goto_page(3);
        let page = state.current_page_slice();
        assert_eq!(page.len(), 5);
        assert_eq!(
            names(&page),
            vec!["App21", "App22", "App23", "App24", "App25"]
        );
        assert_eq!(state.total_pages(), 3);
        assert_eq!(state.range_label(), (21, 25, 25));
    }

    #[test]
    fn test_search_video_resets_page() {
        let mut items = mixed_catalog();
        items.extend(numbered(20));
        let mut state = ListState::new(10);
        state.load(items);
        state.goto_page(2);

        state.apply_filter(Some("video"), None, None);
        assert_eq!(state.filtered_len(), 2);
        assert_eq!(state.current_page(), 1);
        assert_eq!(names(&state.filtered_items()), vec!["IINA", "HandBrake"]);
    }

    #[test]
    fn test_upsert_existing_keeps_position() {
        let mut state = ListState::new(10);
        state.load(numbered(25));
        let before = state.position("App01");

        state.upsert_item(Item::new("App01", "NewCat"));
        assert_eq!(state.all_items().len(), 25);
        assert_eq!(state.position("App01"), before);
        assert_eq!(state.get("App01").unwrap().category, "NewCat");
    }

    #[test]
    fn test_upsert_new_item_goes_first() {
        let mut state = ListState::new(10);
        state.load(numbered(3));
        state.upsert_item(Item::new("Fresh", "Utilities"));
        assert_eq!(state.all_items().len(), 4);
        assert_eq!(state.position("Fresh"), Some(0));
    }

    #[test]
    fn test_filtered_is_exactly_the_matching_subset() {
        let mut state = ListState::new(4);
        state.load(mixed_catalog());

        let predicates: Vec<(Option<&str>, Option<&str>, Option<BadgeType>)> = vec![
            (None, None, None),
            (Some("mü"), None, None),
            (None, Some("Verimlilik"), None),
            (None, None, Some(BadgeType::New)),
            (Some("r"), Some("Verimlilik"), None),
            (Some("nothing at all"), None, None),
            (None, Some("verimlilik"), None),
        ];

        for (search, category, badge) in predicates {
            state.apply_filter(search, category, badge);
            let visible = names(&state.filtered_items());
            for item in state.all_items() {
                let matches = SearchFilter::matches_search(item, search.unwrap_or(""))
                    && SearchFilter::matches_category(item, category)
                    && badge.map_or(true, |b| item.badge_type == b);
                assert_eq!(
                    visible.contains(&item.name),
                    matches,
                    "{} with {:?}/{:?}/{:?}",
                    item.name,
                    search,
                    category,
                    badge
                );
            }
        }
    }

    #[test]
    fn test_category_filter_is_exact() {
        let mut state = ListState::new(10);
        state.load(mixed_catalog());
        state.apply_filter(None, Some("verimlilik"), None);
        assert_eq!(state.filtered_len(), 0);
        state.apply_filter(None, Some("Verimlilik"), None);
        assert_eq!(state.filtered_len(), 2);
    }

    #[test]
    fn test_apply_filter_is_idempotent() {
        let mut state = ListState::new(10);
        state.load(mixed_catalog());
        state.sort_by(SortKey::Name, None);

        state.apply_filter(Some("e"), None, Some(BadgeType::None));
        let first: Vec<Item> = state.filtered_items().into_iter().cloned().collect();
        state.apply_filter(Some("e"), None, Some(BadgeType::None));
        let second: Vec<Item> = state.filtered_items().into_iter().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pagination_bounds() {
        for per_page in [1, 3, 7, 10, 20] {
            for len in [0, 1, 6, 20, 21, 33] {
                let mut state = ListState::new(per_page);
                state.load(numbered(len));
                let expected_pages = len.div_ceil(per_page).max(1);
                assert_eq!(state.total_pages(), expected_pages);

                for page in 1..=expected_pages {
                    state.goto_page(page);
                    let slice_len = state.current_page_slice().len();
                    assert!(slice_len <= per_page);
                    if page < expected_pages {
                        assert_eq!(slice_len, per_page);
                    }
                }
            }
        }
    }

    #[test]
    fn test_goto_page_clamps() {
        let mut state = ListState::new(10);
        state.load(numbered(25));
        state.goto_page(99);
        assert_eq!(state.current_page(), 3);
        state.goto_page(0);
        assert_eq!(state.current_page(), 1);
        assert!(!state.prev_page());
        state.goto_page(3);
        assert!(!state.next_page());
    }

    #[test]
    fn test_removing_last_item_on_last_page_steps_back() {
        let mut state = ListState::new(10);
        state.load(numbered(21));
        state.goto_page(3);
        assert_eq!(state.current_page_slice().len(), 1);

        let (idx, removed) = state.remove_item("App21").unwrap();
        assert_eq!(idx, 20);
        assert_eq!(removed.name, "App21");
        assert_eq!(state.current_page(), 2);
        assert_eq!(state.total_pages(), 2);

        let mut single = ListState::new(10);
        single.load(numbered(1));
        single.remove_item("App01");
        assert_eq!(single.current_page(), 1);
        assert_eq!(single.range_label(), (0, 0, 0));
    }

    #[test]
    fn test_restore_puts_item_back() {
        let mut state = ListState::new(10);
        state.load(numbered(5));
        let (idx, item) = state.remove_item("App03").unwrap();
        state.restore_item(idx, item);
        assert_eq!(state.position("App03"), Some(2));
        assert_eq!(state.all_items().len(), 5);
    }

    #[test]
    fn test_sort_twice_reverses() {
        let mut state = ListState::new(10);
        state.load(mixed_catalog());

        state.sort_by(SortKey::Name, None);
        assert_eq!(state.sort(), Some((SortKey::Name, SortOrder::Asc)));
        let ascending = names(&state.filtered_items());

        state.sort_by(SortKey::Name, None);
        assert_eq!(state.sort(), Some((SortKey::Name, SortOrder::Desc)));
        let mut descending = names(&state.filtered_items());
        descending.reverse();
        assert_eq!(ascending, descending);

        state.sort_by(SortKey::Name, None);
        assert_eq!(names(&state.filtered_items()), ascending);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut state = ListState::new(10);
        state.load(mixed_catalog());
        state.sort_by(SortKey::Name, Some(SortOrder::Desc));
        state.sort_by(SortKey::Category, Some(SortOrder::Asc));

        // Items sharing a category keep the preceding name-descending order
        let productivity: Vec<&str> = state
            .filtered_items()
            .into_iter()
            .filter(|item| item.category == "Verimlilik")
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(productivity, vec!["Rectangle", "Raycast"]);
    }

    #[test]
    fn test_sort_by_creation_date_puts_missing_last_when_descending() {
        let mut state = ListState::new(10);
        state.load(vec![
            Item::new("Old", "A").with_creation_date("2023-01-01T00:00:00Z"),
            Item::new("Undated", "A"),
            Item::new("New", "A").with_creation_date("2024-06-01T12:00:00+03:00"),
        ]);
        state.sort_by(SortKey::CreationDate, Some(SortOrder::Desc));
        assert_eq!(
            names(&state.filtered_items()),
            vec!["New", "Old", "Undated"]
        );
    }

    #[test]
    fn test_sort_keeps_page_and_filter_resets_it() {
        let mut state = ListState::new(10);
        state.load(numbered(25));
        state.goto_page(2);
        state.sort_by(SortKey::Name, Some(SortOrder::Desc));
        assert_eq!(state.current_page(), 2);
        assert_eq!(state.current_page_slice()[0].name, "App15");

        state.clear_filters();
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_update_item_returns_previous_value() {
        let mut state = ListState::new(10);
        state.load(mixed_catalog());
        let before = state
            .update_item("Sketch", |item| item.badge_type = BadgeType::Updated)
            .unwrap();
        assert_eq!(before.badge_type, BadgeType::None);
        assert_eq!(state.get("Sketch").unwrap().badge_type, BadgeType::Updated);
        assert!(state.update_item("Missing", |_| {}).is_none());
    }

    #[test]
    fn test_mutation_respects_active_filter() {
        let mut state = ListState::new(10);
        state.load(mixed_catalog());
        state.apply_filter(None, None, Some(BadgeType::New));
        assert_eq!(state.filtered_len(), 2);

        state.update_item("Rectangle", |item| item.badge_type = BadgeType::New);
        assert_eq!(state.filtered_len(), 3);
        assert_eq!(state.predicate().badge, Some(BadgeType::New));
    }
}
