//! Catalog analytics: completeness overview, content insights, per-category
//! statistics and item quality scores.

use chrono::Local;
use reqwest::Url;
use serde::Serialize;

use crate::data::item::Item;

/// Placeholder image the site shows for apps without artwork
pub const PLACEHOLDER_IMAGE: &str = "logo.png";

const TOP_CATEGORIES: usize = 5;
const SHORT_DESCRIPTION: usize = 50;
const LONG_DESCRIPTION: usize = 200;

fn description_len(item: &Item) -> usize {
    item.description.as_deref().map_or(0, |d| d.chars().count())
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn has_image(item: &Item) -> bool {
    item.image
        .as_deref()
        .is_some_and(|image| !image.is_empty() && image != PLACEHOLDER_IMAGE)
}

fn is_short_description(item: &Item) -> bool {
    item.description.as_deref().is_some_and(|d| !d.is_empty()) && description_len(item) < SHORT_DESCRIPTION
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        (part as f64 * 100.0 / total as f64).round() as u32
    }
}

fn average(sum: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (sum as f64 / count as f64).round() as usize
    }
}

/// Category counts in order of first appearance
fn category_counts(items: &[Item]) -> Vec<(String, Vec<&Item>)> {
    let mut groups: Vec<(String, Vec<&Item>)> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|(name, _)| *name == item.category) {
            Some((_, members)) => members.push(item),
            None => groups.push((item.category.clone(), vec![item])),
        }
    }
    groups
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Completeness {
    pub images: u32,
    pub descriptions: u32,
    pub versions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total: usize,
    pub featured: usize,
    pub with_images: usize,
    pub with_descriptions: usize,
    pub with_versions: usize,
    pub avg_description_len: usize,
    pub top_categories: Vec<(String, usize)>,
    pub completeness: Completeness,
}

pub fn overview(items: &[Item]) -> Overview {
    let total = items.len();
    let with_images = items.iter().filter(|i| has_image(i)).count();
    let with_descriptions = items.iter().filter(|i| description_len(i) > 10).count();
    let with_versions = items.iter().filter(|i| has_text(&i.version)).count();

    let mut top_categories: Vec<(String, usize)> = category_counts(items)
        .into_iter()
        .map(|(name, members)| (name, members.len()))
        .collect();
    top_categories.sort_by(|a, b| b.1.cmp(&a.1));
    top_categories.truncate(TOP_CATEGORIES);

    Overview {
        total,
        featured: items.iter().filter(|i| i.featured).count(),
        with_images,
        with_descriptions,
        with_versions,
        avg_description_len: average(items.iter().map(description_len).sum(), total),
        top_categories,
        completeness: Completeness {
            images: percent(with_images, total),
            descriptions: percent(with_descriptions, total),
            versions: percent(with_versions, total),
        },
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Insights {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn insights(items: &[Item]) -> Insights {
    let total = items.len();
    if total == 0 {
        return Insights::default();
    }

    let mut insights = Vec::new();
    let short = items.iter().filter(|i| is_short_description(i)).count();
    let long = items.iter().filter(|i| description_len(i) > LONG_DESCRIPTION).count();
    let without_images = items.iter().filter(|i| !has_image(i)).count();
    let without_versions = items.iter().filter(|i| !has_text(&i.version)).count();

    if short as f64 > total as f64 * 0.3 {
        insights.push(format!(
            "{}% of apps have a very short description; write more detail",
            percent(short, total)
        ));
    }
    if long as f64 > total as f64 * 0.2 {
        insights.push(format!(
            "{}% of apps have a very long description; keep them concise",
            percent(long, total)
        ));
    }
    if without_images > 0 {
        insights.push(format!("{} apps have no image", without_images));
    }
    if category_counts(items).len() < 3 {
        insights.push("Low category variety; add more categories".to_string());
    }
    let featured_ratio = items.iter().filter(|i| i.featured).count() as f64 / total as f64;
    if featured_ratio < 0.1 {
        insights.push("Very few apps are featured".to_string());
    } else if featured_ratio > 0.5 {
        insights.push("Too many apps are featured; be selective".to_string());
    }

    let mut recommendations = Vec::new();
    if without_images > 0 {
        recommendations.push(format!("Add images to {} apps", without_images));
    }
    if short > 0 {
        recommendations.push(format!("Expand the description of {} apps", short));
    }
    if without_versions > 0 {
        recommendations.push(format!("Add version information to {} apps", without_versions));
    }

    Insights {
        insights,
        recommendations,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: String,
    pub count: usize,
    pub percentage: u32,
    pub avg_description_len: usize,
    pub image_coverage: u32,
    pub featured: usize,
    pub featured_percentage: u32,
}

/// Per-category statistics, largest category first
pub fn category_analysis(items: &[Item]) -> Vec<CategoryStats> {
    let mut stats: Vec<CategoryStats> = category_counts(items)
        .into_iter()
        .map(|(category, members)| {
            let count = members.len();
            let featured = members.iter().filter(|i| i.featured).count();
            CategoryStats {
                category,
                count,
                percentage: percent(count, items.len()),
                avg_description_len: average(members.iter().map(|i| description_len(i)).sum(), count),
                image_coverage: percent(members.iter().filter(|i| has_image(i)).count(), count),
                featured,
                featured_percentage: percent(featured, count),
            }
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Excellent,
    Good,
    Average,
    Poor,
}

impl QualityLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => QualityLevel::Excellent,
            70..=89 => QualityLevel::Good,
            50..=69 => QualityLevel::Average,
            _ => QualityLevel::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Excellent => "excellent",
            QualityLevel::Good => "good",
            QualityLevel::Average => "average",
            QualityLevel::Poor => "poor",
        }
    }
}

/// Weighted completeness score, 0 to 100
pub fn quality_score(item: &Item) -> u32 {
    let valid_url = |value: &Option<String>| value.as_deref().is_some_and(|v| Url::parse(v).is_ok());

    let checks = [
        (!item.name.is_empty(), 10),
        (description_len(item) > 20, 15),
        (!item.category.is_empty(), 10),
        (valid_url(&item.website), 5),
        (has_image(item) && valid_url(&item.image), 20),
        (has_text(&item.version), 10),
        (has_text(&item.file_size), 10),
        (item.featured, 10),
        (item.seo_title.as_deref().is_some_and(|t| !t.is_empty()), 5),
        (item.seo_description.as_deref().is_some_and(|d| !d.is_empty()), 5),
    ];
    let score: u32 = checks.iter().filter(|(hit, _)| *hit).map(|(_, points)| points).sum();
    score.min(100)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredItem {
    pub name: String,
    pub score: u32,
    pub level: QualityLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QualityDistribution {
    pub excellent: usize,
    pub good: usize,
    pub average: usize,
    pub poor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub average: u32,
    pub distribution: QualityDistribution,
    /// Highest score first
    pub scores: Vec<ScoredItem>,
    pub recommendations: Vec<String>,
}

pub fn quality_report(items: &[Item]) -> QualityReport {
    let mut scores: Vec<ScoredItem> = items
        .iter()
        .map(|item| {
            let score = quality_score(item);
            ScoredItem {
                name: item.name.clone(),
                score,
                level: QualityLevel::from_score(score),
            }
        })
        .collect();
    scores.sort_by(|a, b| b.score.cmp(&a.score));

    let mut distribution = QualityDistribution::default();
    for scored in &scores {
        match scored.level {
            QualityLevel::Excellent => distribution.excellent += 1,
            QualityLevel::Good => distribution.good += 1,
            QualityLevel::Average => distribution.average += 1,
            QualityLevel::Poor => distribution.poor += 1,
        }
    }

    let mut recommendations = Vec::new();
    if distribution.poor > 0 {
        recommendations.push(format!("{} apps have poor quality and need work", distribution.poor));
    }
    let without_seo = items
        .iter()
        .filter(|i| !has_text(&i.seo_title) || !has_text(&i.seo_description))
        .count();
    if without_seo > 0 {
        recommendations.push(format!("Add SEO fields to {} apps", without_seo));
    }

    let total: usize = scores.iter().map(|s| s.score as usize).sum();
    QualityReport {
        average: average(total, scores.len()) as u32,
        distribution,
        scores,
        recommendations,
    }
}

/// Everything `report export` writes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub generated_at: String,
    pub overview: Overview,
    pub insights: Insights,
    pub categories: Vec<CategoryStats>,
    pub quality: QualityReport,
}

impl AnalyticsReport {
    pub fn build(items: &[Item]) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            overview: overview(items),
            insights: insights(items),
            categories: category_analysis(items),
            quality: quality_report(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Item> {
        let mut sketch = Item::new("Sketch", "Grafik ve Tasarım")
            .with_description("Vector design toolkit for interfaces, icons and prototypes on the Mac");
        sketch.image = Some("https://example.com/sketch.png".to_string());
        sketch.website = Some("https://sketch.com".to_string());
        sketch.version = Some("99.1".to_string());
        sketch.file_size = Some("60 MB".to_string());
        sketch.featured = true;
        sketch.seo_title = Some("Sketch".to_string());
        sketch.seo_description = Some("Design".to_string());

        let mut logic = Item::new("Logic Pro", "Müzik").with_description("Studio");
        logic.image = Some(PLACEHOLDER_IMAGE.to_string());
        logic.version = Some(" ".to_string());

        let rectangle = Item::new("Rectangle", "Grafik ve Tasarım");

        vec![sketch, logic, rectangle]
    }

    #[test]
    fn test_overview_counts() {
        let overview = overview(&catalog());
        assert_eq!(overview.total, 3);
        assert_eq!(overview.featured, 1);
        assert_eq!(overview.with_images, 1);
        assert_eq!(overview.with_descriptions, 1);
        assert_eq!(overview.with_versions, 1);
        assert_eq!(
            overview.top_categories,
            vec![("Grafik ve Tasarım".to_string(), 2), ("Müzik".to_string(), 1)]
        );
        assert_eq!(overview.completeness.images, 33);

        let empty = super::overview(&[]);
        assert_eq!(empty.avg_description_len, 0);
        assert_eq!(empty.completeness, Completeness::default());
    }

    #[test]
    fn test_insights_and_recommendations() {
        let result = insights(&catalog());
        assert!(result.insights.contains(&"2 apps have no image".to_string()));
        assert!(result
            .insights
            .contains(&"Low category variety; add more categories".to_string()));
        // "Studio" is the only short one; 1 of 3 is above the 30% line
        assert!(result.insights[0].starts_with("33% of apps"));
        assert_eq!(
            result.recommendations,
            vec![
                "Add images to 2 apps",
                "Expand the description of 1 apps",
                "Add version information to 2 apps",
            ]
        );
        assert_eq!(insights(&[]), Insights::default());
    }

    #[test]
    fn test_category_analysis_orders_by_size() {
        let stats = category_analysis(&catalog());
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].category, "Grafik ve Tasarım");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].percentage, 67);
        assert_eq!(stats[0].image_coverage, 50);
        assert_eq!(stats[0].featured_percentage, 50);
        assert_eq!(stats[1].avg_description_len, 6);
    }

    #[test]
    fn test_quality_scores_and_levels() {
        let items = catalog();
        assert_eq!(quality_score(&items[0]), 100);
        // name, category and short description only
        assert_eq!(quality_score(&items[1]), 20);
        assert_eq!(QualityLevel::from_score(89), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(50), QualityLevel::Average);

        let report = quality_report(&items);
        assert_eq!(report.scores[0].name, "Sketch");
        assert_eq!(report.scores[0].level, QualityLevel::Excellent);
        assert_eq!(report.distribution.excellent, 1);
        assert_eq!(report.distribution.poor, 2);
        assert_eq!(report.average, 47);
        assert_eq!(
            report.recommendations,
            vec!["2 apps have poor quality and need work", "Add SEO fields to 2 apps"]
        );
    }
}
