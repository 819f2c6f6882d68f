use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use super::{filter_summary, pager, range_line, RenderOptions};
use crate::data::item::{BadgeType, Item};
use crate::data::list_state::{ListState, SortKey};
use crate::seo::{self, SeoFields};

const COLUMNS: [(&str, Option<SortKey>); 7] = [
    ("#", None),
    ("Name", Some(SortKey::Name)),
    ("Category", Some(SortKey::Category)),
    ("Badge", Some(SortKey::Badge)),
    ("Featured", Some(SortKey::Featured)),
    ("Version", None),
    ("Created", Some(SortKey::CreationDate)),
];

fn header(state: &ListState, options: &RenderOptions) -> Vec<Cell> {
    let mut cells: Vec<Cell> = COLUMNS
        .iter()
        .map(|(title, key)| {
            let label = match (key, state.sort()) {
                (Some(key), Some((active, order))) if *key == active => {
                    format!("{} {}", title, order.indicator())
                }
                _ => title.to_string(),
            };
            Cell::new(label).add_attribute(Attribute::Bold)
        })
        .collect();
    if options.show_seo_score {
        cells.push(Cell::new("SEO").add_attribute(Attribute::Bold));
    }
    cells
}

fn badge_cell(badge: BadgeType) -> Cell {
    let cell = Cell::new(badge.label());
    match badge {
        BadgeType::New => cell.fg(Color::Green),
        BadgeType::Updated => cell.fg(Color::Yellow),
        BadgeType::None => cell,
    }
}

fn seo_cell(item: &Item) -> Cell {
    let score = seo::analyze(&SeoFields::from_item(item)).overall;
    let color = match score {
        80.. => Color::Green,
        50..=79 => Color::Yellow,
        _ => Color::Red,
    };
    Cell::new(score).fg(color)
}

fn row(number: usize, item: &Item, options: &RenderOptions) -> Vec<Cell> {
    let mut cells = vec![
        Cell::new(number),
        Cell::new(&item.name),
        Cell::new(&item.category),
        badge_cell(item.badge_type),
        Cell::new(if item.featured { "★" } else { "" }),
        Cell::new(item.version.as_deref().unwrap_or("")),
        Cell::new(item.display_date()),
    ];
    if options.show_seo_score {
        cells.push(seo_cell(item));
    }
    cells
}

/// The current page of the admin view as a table with stats and pager
pub fn render(state: &ListState, options: &RenderOptions) -> String {
    let stats = state.stats();
    let mut out = Vec::new();

    out.push(options.bold(&format!(
        "{} items, {} categories",
        stats.items, stats.categories
    )));
    if let Some(summary) = filter_summary(state) {
        out.push(summary);
    }

    let page = state.current_page_slice();
    if page.is_empty() {
        out.push(options.paint("No items match.", crossterm::style::Color::Yellow));
        return out.join("\n");
    }

    let mut table = Table::new();
    if !options.use_color {
        table.force_no_tty();
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header(state, options));

    let (first, _, _) = state.range_label();
    for (offset, item) in page.iter().enumerate() {
        table.add_row(row(first + offset, item, options));
    }

    out.push(table.to_string());
    out.push(format!("{}    {}", range_line(state), pager(state, options)));
    out.join("\n")
}

/// Every stored field of one item, for the `show` command
pub fn render_details(item: &Item, options: &RenderOptions) -> String {
    let mut table = Table::new();
    if !options.use_color {
        table.force_no_tty();
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut add = |label: &str, value: String| {
        if !value.is_empty() {
            table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
        }
    };
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();

    add("Name", item.name.clone());
    add("Category", item.category.clone());
    add("Badge", item.badge_type.to_string());
    add("Featured", item.featured.to_string());
    add("Version", opt(&item.version));
    add("Size", opt(&item.file_size));
    add("Created", opt(&item.creation_date));
    add("Modified", opt(&item.last_modified));
    add("Download", opt(&item.download_url));
    add("Website", opt(&item.website));
    add("Image", opt(&item.image));
    add("Description", opt(&item.description));
    add("Features", item.features.join("\n"));
    add("Requirements", item.system_requirements.join("\n"));
    add("Screenshots", item.internal_images.len().to_string());

    let tags = seo::meta_tags(item);
    add("SEO title", tags.title);
    add("SEO description", tags.description);
    add("SEO keywords", tags.keywords);
    add("SEO slug", tags.slug);
    add("Image alt", tags.image_alt);

    table.to_string()
}
