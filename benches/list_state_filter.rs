use catalog_console::data::item::{BadgeType, Item};
use catalog_console::data::list_state::{ListState, SortKey, SortOrder};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn create_catalog(count: usize) -> Vec<Item> {
    let categories = [
        "Geliştirici Araçları",
        "Grafik ve Tasarım",
        "Müzik",
        "Video ve Müzik",
        "Verimlilik",
        "Yardımcı Araçlar",
        "Eğitim",
        "Oyunlar",
    ];
    let badges = [BadgeType::None, BadgeType::New, BadgeType::Updated];

    (0..count)
        .map(|i| {
            Item::new(format!("App {:06}", i), categories[i % categories.len()])
                .with_badge(badges[i % badges.len()])
                .with_description(format!("Build {} of a handy Mac utility", i))
                .with_creation_date(format!(
                    "2024-{:02}-{:02}T10:00:00Z",
                    i % 12 + 1,
                    i % 28 + 1
                ))
        })
        .collect()
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_state_search");

    for count in [1_000, 10_000, 50_000] {
        let mut state = ListState::new(10).with_sort(SortKey::CreationDate, SortOrder::Desc);
        state.load(create_catalog(count));

        group.bench_function(format!("{}_items", count), |b| {
            b.iter(|| {
                state.apply_filter(black_box(Some("müzik")), None, None);
                assert!(state.filtered_len() > 0);
            });
        });
    }

    group.finish();
}

fn benchmark_sort_and_page(c: &mut Criterion) {
    let mut state = ListState::new(20);
    state.load(create_catalog(50_000));

    let mut group = c.benchmark_group("list_state_sort");

    group.bench_function("toggle_name", |b| {
        b.iter(|| {
            state.sort_by(black_box(SortKey::Name), None);
        });
    });

    group.bench_function("recent_desc", |b| {
        b.iter(|| {
            state.sort_by(black_box(SortKey::Recent), Some(SortOrder::Desc));
        });
    });

    group.bench_function("category_filter_page_5", |b| {
        b.iter(|| {
            state.apply_filter(None, black_box(Some("Verimlilik")), Some(BadgeType::New));
            state.goto_page(5);
            black_box(state.current_page_slice());
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_search, benchmark_sort_and_page);
criterion_main!(benches);
