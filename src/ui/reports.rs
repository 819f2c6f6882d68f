//! Tables for the moderation and analytics commands.

use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use super::RenderOptions;
use crate::analytics::{CategoryStats, Insights, Overview, QualityLevel, QualityReport};
use crate::cache::{CacheStats, CachedList};
use crate::moderation::{Flagged, ModerationReport};

fn table(options: &RenderOptions, headers: &[&str]) -> Table {
    let mut table = Table::new();
    if !options.use_color {
        table.force_no_tty();
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if !headers.is_empty() {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    }
    table
}

fn label(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn bullets(title: &str, lines: &[String], options: &RenderOptions) -> Vec<String> {
    if lines.is_empty() {
        return Vec::new();
    }
    let mut out = vec![options.bold(title)];
    out.extend(lines.iter().map(|line| format!("  • {}", line)));
    out
}

pub fn render_moderation(report: &ModerationReport, options: &RenderOptions) -> String {
    let mut out = vec![options.bold(&format!(
        "{} apps checked: {} with content issues, {} spam, {} with missing data",
        report.total, report.issues_found, report.spam_count, report.missing_data
    ))];

    if report.findings.is_empty() {
        out.push(options.paint("No problems found.", crossterm::style::Color::Green));
        return out.join("\n");
    }

    let mut table = table(options, &["Name", "Category", "Problems"]);
    for finding in &report.findings {
        let mut problems: Vec<String> = Vec::new();
        if finding.spam {
            problems.push("Spam content detected".to_string());
        }
        problems.extend(finding.content_issues.iter().cloned());
        problems.extend(finding.validation_errors.iter().cloned());

        let name = Cell::new(&finding.name);
        table.add_row(vec![
            if finding.spam { name.fg(Color::Red) } else { name },
            Cell::new(&finding.category),
            Cell::new(problems.join("\n")),
        ]);
    }
    out.push(table.to_string());
    out.join("\n")
}

/// Result of a single check
pub fn render_flagged(title: &str, flagged: &[Flagged], options: &RenderOptions) -> String {
    if flagged.is_empty() {
        return format!("{}: nothing flagged", title);
    }
    let mut table = table(options, &["Name", "Issues"]);
    for entry in flagged {
        table.add_row(vec![Cell::new(&entry.name), Cell::new(entry.issues.join("\n"))]);
    }
    format!(
        "{}\n{}",
        options.bold(&format!("{}: {} flagged", title, flagged.len())),
        table
    )
}

pub fn render_overview(overview: &Overview, options: &RenderOptions) -> String {
    let mut table = table(options, &[]);
    let share = |count: usize, pct: u32| format!("{} ({}%)", count, pct);
    table.add_row(vec![label("Apps"), Cell::new(overview.total)]);
    table.add_row(vec![label("Featured"), Cell::new(overview.featured)]);
    table.add_row(vec![
        label("With image"),
        Cell::new(share(overview.with_images, overview.completeness.images)),
    ]);
    table.add_row(vec![
        label("With description"),
        Cell::new(share(
            overview.with_descriptions,
            overview.completeness.descriptions,
        )),
    ]);
    table.add_row(vec![
        label("With version"),
        Cell::new(share(overview.with_versions, overview.completeness.versions)),
    ]);
    table.add_row(vec![
        label("Avg. description"),
        Cell::new(format!("{} chars", overview.avg_description_len)),
    ]);
    let top: Vec<String> = overview
        .top_categories
        .iter()
        .map(|(name, count)| format!("{} ({})", name, count))
        .collect();
    table.add_row(vec![label("Top categories"), Cell::new(top.join("\n"))]);

    format!("{}\n{}", options.bold("Catalog overview"), table)
}

pub fn render_insights(insights: &Insights, options: &RenderOptions) -> String {
    let mut out = bullets("Insights", &insights.insights, options);
    out.extend(bullets("Recommendations", &insights.recommendations, options));
    if out.is_empty() {
        return "Nothing to report.".to_string();
    }
    out.join("\n")
}

pub fn render_categories(stats: &[CategoryStats], options: &RenderOptions) -> String {
    if stats.is_empty() {
        return "No categories.".to_string();
    }
    let mut table = table(
        options,
        &["Category", "Apps", "Share", "Avg. desc", "Images", "Featured"],
    );
    for entry in stats {
        table.add_row(vec![
            Cell::new(&entry.category),
            Cell::new(entry.count),
            Cell::new(format!("{}%", entry.percentage)),
            Cell::new(entry.avg_description_len),
            Cell::new(format!("{}%", entry.image_coverage)),
            Cell::new(format!("{} ({}%)", entry.featured, entry.featured_percentage)),
        ]);
    }
    format!(
        "{}\n{}",
        options.bold(&format!(
            "{} categories, most popular: {}",
            stats.len(),
            stats[0].category
        )),
        table
    )
}

fn level_cell(level: QualityLevel) -> Cell {
    let cell = Cell::new(level.as_str());
    match level {
        QualityLevel::Excellent => cell.fg(Color::Green),
        QualityLevel::Good => cell.fg(Color::Cyan),
        QualityLevel::Average => cell.fg(Color::Yellow),
        QualityLevel::Poor => cell.fg(Color::Red),
    }
}

/// Summary plus the `limit` lowest-scoring apps
pub fn render_quality(report: &QualityReport, limit: usize, options: &RenderOptions) -> String {
    let d = &report.distribution;
    let mut out = vec![options.bold(&format!(
        "Average quality {} (excellent {}, good {}, average {}, poor {})",
        report.average, d.excellent, d.good, d.average, d.poor
    ))];

    if !report.scores.is_empty() {
        let mut table = table(options, &["Name", "Score", "Level"]);
        for scored in report.scores.iter().rev().take(limit) {
            table.add_row(vec![
                Cell::new(&scored.name),
                Cell::new(scored.score),
                level_cell(scored.level),
            ]);
        }
        out.push(table.to_string());
    }
    out.extend(bullets("Recommendations", &report.recommendations, options));
    out.join("\n")
}

/// `cache` command output
pub fn render_cache(stats: &CacheStats, entries: &[CachedList], options: &RenderOptions) -> String {
    let mut out = vec![options.bold(&format!(
        "{} cached lists, {} items, {}",
        stats.total_lists,
        stats.total_items,
        stats.format_size()
    ))];
    if !entries.is_empty() {
        let mut table = table(options, &["Id", "Source", "Items", "Fetched"]);
        for entry in entries {
            table.add_row(vec![
                Cell::new(entry.id),
                Cell::new(&entry.source_url),
                Cell::new(entry.item_count),
                Cell::new(entry.fetched_at.format("%d.%m.%Y %H:%M").to_string()),
            ]);
        }
        out.push(table.to_string());
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics;
    use crate::data::item::Item;
    use crate::moderation;

    fn plain() -> RenderOptions {
        RenderOptions {
            use_color: false,
            ..RenderOptions::default()
        }
    }

    fn catalog() -> Vec<Item> {
        vec![
            Item::new("Rectangle", "Verimlilik")
                .with_description("Move and resize windows with shortcuts"),
            Item::new("Crack Hack Pro", "Verimlilik").with_description("Unlimited everything"),
        ]
    }

    #[test]
    fn test_moderation_table_lists_only_flagged() {
        let report = moderation::report(&catalog());
        let text = render_moderation(&report, &plain());
        assert!(text.starts_with("2 apps checked"));
        assert!(text.contains("Crack Hack Pro"));
        assert!(text.contains("Spam content detected"));
        // Rectangle has no website, so it is flagged for missing data
        assert!(text.contains("Invalid website URL"));
    }

    #[test]
    fn test_flagged_empty_and_filled() {
        let spam = moderation::scan(&catalog(), moderation::Check::Spam);
        assert!(render_flagged("Spam", &spam, &plain()).starts_with("Spam: 1 flagged"));
        assert_eq!(render_flagged("Spam", &[], &plain()), "Spam: nothing flagged");
    }

    #[test]
    fn test_analytics_tables() {
        let items = catalog();
        let overview = render_overview(&analytics::overview(&items), &plain());
        assert!(overview.contains("Verimlilik (2)"));

        let categories = render_categories(&analytics::category_analysis(&items), &plain());
        assert!(categories.starts_with("1 categories, most popular: Verimlilik"));

        let quality = render_quality(&analytics::quality_report(&items), 5, &plain());
        assert!(quality.starts_with("Average quality"));
        assert!(quality.contains("poor"));

        let insights = render_insights(&analytics::insights(&items), &plain());
        assert!(insights.contains("2 apps have no image"));
    }
}
