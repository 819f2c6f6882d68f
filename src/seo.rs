//! SEO helpers for catalog listings.
//!
//! Slugs, field limits, auto-generated metadata and a simple 0-100 scoring
//! of the four main SEO fields. All lengths count Unicode scalar values.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::data::item::Item;

pub const BRAND: &str = "MacFreeApps";

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("static pattern"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static pattern"));
static DASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("static pattern"));
static SLUG_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("static pattern"));
// ASCII word characters only, so accented letters split words
static NON_WORD_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("static pattern"));

const BASE_KEYWORDS: [&str; 5] = ["mac", "uygulama", "ücretsiz", "indir", "macfreeapps"];
const MAX_KEYWORDS: usize = 10;
const MAX_DESCRIPTION_KEYWORDS: usize = 5;
const FEATURED_HINTS: [&str; 6] = ["popüler", "en iyi", "önerilen", "yeni", "güncel", "trend"];
const FEATURED_CATEGORIES: [&str; 3] = ["Oyunlar", "Programlar", "Grafik ve Tasarım"];

/// Per-category wording used by the generators
struct CategoryProfile {
    category: &'static str,
    title_suffix: &'static str,
    description_prefix: &'static str,
    keywords: &'static [&'static str],
    alt_prefix: &'static str,
}

const CATEGORY_PROFILES: [CategoryProfile; 8] = [
    CategoryProfile {
        category: "Oyunlar",
        title_suffix: " - Ücretsiz Mac Oyunu | MacFreeApps",
        description_prefix: "Mac için ücretsiz oyun",
        keywords: &["oyun", "game", "eğlence", "mac oyun"],
        alt_prefix: "Mac oyunu",
    },
    CategoryProfile {
        category: "Programlar",
        title_suffix: " - Ücretsiz Mac Programı | MacFreeApps",
        description_prefix: "Mac için ücretsiz program",
        keywords: &["program", "software", "yazılım", "mac program"],
        alt_prefix: "Mac programı",
    },
    CategoryProfile {
        category: "İş",
        title_suffix: " - Mac İş Uygulaması | MacFreeApps",
        description_prefix: "Mac için iş uygulaması",
        keywords: &["iş", "business", "ofis", "mac iş"],
        alt_prefix: "Mac iş uygulaması",
    },
    CategoryProfile {
        category: "Eğitim",
        title_suffix: " - Mac Eğitim Uygulaması | MacFreeApps",
        description_prefix: "Mac için eğitim uygulaması",
        keywords: &["eğitim", "education", "öğrenme", "mac eğitim"],
        alt_prefix: "Mac eğitim uygulaması",
    },
    CategoryProfile {
        category: "Grafik ve Tasarım",
        title_suffix: " - Mac Tasarım Uygulaması | MacFreeApps",
        description_prefix: "Mac için tasarım uygulaması",
        keywords: &["tasarım", "design", "grafik", "mac tasarım"],
        alt_prefix: "Mac tasarım uygulaması",
    },
    CategoryProfile {
        category: "Fotoğraf ve Video",
        title_suffix: " - Mac Medya Uygulaması | MacFreeApps",
        description_prefix: "Mac için medya uygulaması",
        keywords: &["fotoğraf", "video", "medya", "mac medya"],
        alt_prefix: "Mac medya uygulaması",
    },
    CategoryProfile {
        category: "Verimlilik",
        title_suffix: " - Mac Verimlilik Uygulaması | MacFreeApps",
        description_prefix: "Mac için verimlilik uygulaması",
        keywords: &["verimlilik", "productivity", "mac verimlilik"],
        alt_prefix: "Mac verimlilik uygulaması",
    },
    CategoryProfile {
        category: "Yardımcı Programlar",
        title_suffix: " - Mac Yardımcı Program | MacFreeApps",
        description_prefix: "Mac için yardımcı program",
        keywords: &["yardımcı", "utility", "araç", "mac araç"],
        alt_prefix: "Mac yardımcı program",
    },
];

const DEFAULT_TITLE_SUFFIX: &str = " - Ücretsiz Mac Uygulaması | MacFreeApps";
const DEFAULT_DESCRIPTION_PREFIX: &str = "Mac uygulaması";
const DEFAULT_ALT_PREFIX: &str = "Mac uygulaması";

fn profile(category: &str) -> Option<&'static CategoryProfile> {
    CATEGORY_PROFILES.iter().find(|p| p.category == category)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// URL slug: lowercase ASCII letters, digits and single dashes
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let dashed = WHITESPACE.replace_all(&stripped, "-");
    let collapsed = DASH_RUNS.replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_FORMAT.is_match(slug)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeoField {
    Title,
    Description,
    Keywords,
    Slug,
    ImageAlt,
}

impl SeoField {
    pub const ALL: [SeoField; 5] = [
        SeoField::Title,
        SeoField::Description,
        SeoField::Keywords,
        SeoField::Slug,
        SeoField::ImageAlt,
    ];

    pub fn max_len(&self) -> usize {
        match self {
            SeoField::Title => 60,
            SeoField::Description => 160,
            SeoField::Keywords => 200,
            SeoField::Slug => 100,
            SeoField::ImageAlt => 125,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeoField::Title => "title",
            SeoField::Description => "description",
            SeoField::Keywords => "keywords",
            SeoField::Slug => "slug",
            SeoField::ImageAlt => "image alt",
        }
    }
}

/// Colour band of a character counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterLevel {
    Ok,
    Warning,
    Danger,
}

pub fn counter_level(text: &str, field: SeoField) -> CounterLevel {
    let ratio = char_len(text) as f64 / field.max_len() as f64;
    if ratio > 0.9 {
        CounterLevel::Danger
    } else if ratio > 0.8 {
        CounterLevel::Warning
    } else {
        CounterLevel::Ok
    }
}

/// The five editable SEO fields of an item; empty means unset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoFields {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub slug: String,
    pub image_alt: String,
}

impl SeoFields {
    pub fn from_item(item: &Item) -> Self {
        let get = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            title: get(&item.seo_title),
            description: get(&item.seo_description),
            keywords: get(&item.seo_keywords),
            slug: get(&item.seo_slug),
            image_alt: get(&item.seo_image_alt),
        }
    }

    /// Write the fields back, clearing empty ones
    pub fn apply_to(&self, item: &mut Item) {
        let set = |v: &str| (!v.is_empty()).then(|| v.to_string());
        item.seo_title = set(&self.title);
        item.seo_description = set(&self.description);
        item.seo_keywords = set(&self.keywords);
        item.seo_slug = set(&self.slug);
        item.seo_image_alt = set(&self.image_alt);
    }

    pub fn get(&self, field: SeoField) -> &str {
        match field {
            SeoField::Title => &self.title,
            SeoField::Description => &self.description,
            SeoField::Keywords => &self.keywords,
            SeoField::Slug => &self.slug,
            SeoField::ImageAlt => &self.image_alt,
        }
    }
}

/// Every rule the fields break. Unset fields are not checked.
pub fn validate(fields: &SeoFields) -> Vec<String> {
    let mut errors = Vec::new();

    if char_len(&fields.title) > SeoField::Title.max_len() {
        errors.push("SEO title cannot be longer than 60 characters".to_string());
    }
    if char_len(&fields.description) > SeoField::Description.max_len() {
        errors.push("SEO description cannot be longer than 160 characters".to_string());
    }
    if !fields.slug.is_empty() && !is_valid_slug(&fields.slug) {
        errors.push(
            "URL slug may only contain lowercase letters, digits and dashes".to_string(),
        );
    }
    if char_len(&fields.keywords) > SeoField::Keywords.max_len() {
        errors.push("SEO keywords cannot be longer than 200 characters".to_string());
    }

    errors
}

/// Values for the page head: stored fields, else brand defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTags {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub slug: String,
    pub image_alt: String,
    pub featured: bool,
}

pub fn meta_tags(item: &Item) -> MetaTags {
    let stored = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
    let name = &item.name;

    MetaTags {
        title: stored(&item.seo_title)
            .unwrap_or_else(|| format!("{} - Ücretsiz Mac Uygulaması | {}", name, BRAND)),
        description: stored(&item.seo_description)
            .or_else(|| stored(&item.description))
            .unwrap_or_else(|| {
                format!(
                    "{} ücretsiz Mac uygulamasını indirin. En popüler Mac uygulamaları {}'de.",
                    name, BRAND
                )
            }),
        keywords: stored(&item.seo_keywords)
            .unwrap_or_else(|| format!("{}, mac, uygulama, ücretsiz, {}", name, item.category)),
        slug: stored(&item.seo_slug).unwrap_or_else(|| slugify(name)),
        image_alt: stored(&item.seo_image_alt)
            .unwrap_or_else(|| format!("{} uygulama logosu ve özellikleri", name)),
        featured: item.featured,
    }
}

pub fn auto_title(name: &str, category: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let suffix = profile(category).map_or(DEFAULT_TITLE_SUFFIX, |p| p.title_suffix);
    let limit = SeoField::Title.max_len();

    let full = format!("{}{}", name, suffix);
    if char_len(&full) <= limit {
        return full;
    }
    let short = format!("{} Mac Uygulaması | {}", name, BRAND);
    if char_len(&short) <= limit {
        return short;
    }
    format!("{} | {}", name, BRAND)
}

pub fn auto_description(name: &str, category: &str, description: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let prefix = profile(category).map_or(DEFAULT_DESCRIPTION_PREFIX, |p| p.description_prefix);
    let body = if description.is_empty() {
        format!("{} hakkında detaylı bilgi", name)
    } else {
        description.to_string()
    };
    let limit = SeoField::Description.max_len();

    let full = format!("{} {}. {} {} ile ücretsiz indirin.", prefix, name, body, BRAND);
    if char_len(&full) <= limit {
        return full;
    }
    let short = format!("{} {}. {} ile ücretsiz indirin.", prefix, name, BRAND);
    if char_len(&short) <= limit {
        return short;
    }
    format!("{} Mac uygulaması. {} ile ücretsiz indirin.", name, BRAND)
}

/// Comma-separated keyword list, at most ten, in first-seen order
pub fn auto_keywords(name: &str, category: &str, description: &str) -> String {
    let mut seen = BTreeSet::new();
    let mut keywords: Vec<String> = Vec::new();
    let mut add = |word: &str| {
        if seen.insert(word.to_string()) {
            keywords.push(word.to_string());
        }
    };

    BASE_KEYWORDS.iter().for_each(|k| add(k));

    name.to_lowercase()
        .split_whitespace()
        .filter(|w| char_len(w) > 2)
        .for_each(|w| add(w));

    if let Some(p) = profile(category) {
        p.keywords.iter().for_each(|k| add(k));
    }

    if !description.is_empty() {
        let lowered = description.to_lowercase();
        let cleaned = NON_WORD_CHARS.replace_all(&lowered, " ");
        cleaned
            .split_whitespace()
            .filter(|w| char_len(w) > 3 && !["mac", "uygulama", "ücretsiz"].contains(w))
            .take(MAX_DESCRIPTION_KEYWORDS)
            .for_each(|w| add(w));
    }

    keywords.truncate(MAX_KEYWORDS);
    keywords.join(", ")
}

pub fn auto_image_alt(name: &str, category: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let prefix = profile(category).map_or(DEFAULT_ALT_PREFIX, |p| p.alt_prefix);
    format!("{} {} ekran görüntüsü", prefix, name)
}

/// Whether a new listing looks worth featuring
pub fn should_feature(name: &str, category: &str, description: &str) -> bool {
    let name = name.to_lowercase();
    let desc = description.to_lowercase();
    let has_hint = FEATURED_HINTS
        .iter()
        .any(|hint| desc.contains(hint) || name.contains(hint));

    has_hint || FEATURED_CATEGORIES.contains(&category) || char_len(description) > 100
}

/// Generate every SEO field for `item` and set its featured flag
pub fn auto_fill(item: &mut Item) {
    if item.name.is_empty() {
        return;
    }
    let description = item.description.clone().unwrap_or_default();
    let fields = SeoFields {
        title: auto_title(&item.name, &item.category),
        description: auto_description(&item.name, &item.category, &description),
        keywords: auto_keywords(&item.name, &item.category, &description),
        slug: slugify(&item.name),
        image_alt: auto_image_alt(&item.name, &item.category),
    };
    fields.apply_to(item);
    item.featured = should_feature(&item.name, &item.category, &description);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldScore {
    pub score: u32,
    pub feedback: String,
}

impl FieldScore {
    fn missing(what: &str) -> Self {
        Self {
            score: 0,
            feedback: format!("{} missing", what),
        }
    }
}

#[derive(Debug, Default)]
struct Scorer {
    score: u32,
    notes: Vec<&'static str>,
}

impl Scorer {
    fn length(&mut self, len: usize, ideal: std::ops::RangeInclusive<usize>, short: &'static str, long: &'static str) {
        if ideal.contains(&len) {
            self.add(40, "ideal length");
        } else if len < *ideal.start() {
            self.add(20, short);
        } else {
            self.add(10, long);
        }
    }

    fn check(&mut self, passed: bool, points: u32, yes: &'static str, no: Option<&'static str>) {
        if passed {
            self.add(points, yes);
        } else if let Some(no) = no {
            self.notes.push(no);
        }
    }

    fn add(&mut self, points: u32, note: &'static str) {
        self.score += points;
        self.notes.push(note);
    }

    fn finish(self) -> FieldScore {
        FieldScore {
            score: self.score.min(100),
            feedback: self.notes.join(", "),
        }
    }
}

pub fn analyze_title(title: &str) -> FieldScore {
    if title.is_empty() {
        return FieldScore::missing("title");
    }
    let mut s = Scorer::default();
    s.length(char_len(title), 30..=60, "too short", "too long");
    s.check(title.contains("Mac") || title.contains("mac"), 20, "mentions Mac", None);
    s.check(title.contains("Ücretsiz") || title.contains("ücretsiz"), 20, "mentions free", None);
    s.check(title.contains(BRAND), 20, "has brand name", None);
    s.finish()
}

pub fn analyze_description(description: &str) -> FieldScore {
    if description.is_empty() {
        return FieldScore::missing("description");
    }
    let mut s = Scorer::default();
    s.length(char_len(description), 120..=160, "too short", "too long");
    s.check(description.contains("Mac"), 20, "mentions Mac", None);
    s.check(
        description.contains("ücretsiz") || description.contains("indir"),
        20,
        "has call to action",
        None,
    );
    s.check(description.contains(BRAND), 20, "has brand name", None);
    s.finish()
}

pub fn analyze_keywords(keywords: &str) -> FieldScore {
    if keywords.is_empty() {
        return FieldScore::missing("keywords");
    }
    let mut s = Scorer::default();
    s.length(keywords.split(',').count(), 5..=10, "few keywords", "too many keywords");
    s.check(keywords.contains("mac"), 20, "has mac", None);
    s.check(keywords.contains("ücretsiz"), 20, "has ücretsiz", None);
    s.check(keywords.contains("indir"), 20, "has indir", None);
    s.finish()
}

pub fn analyze_slug(slug: &str) -> FieldScore {
    if slug.is_empty() {
        return FieldScore::missing("slug");
    }
    let mut s = Scorer::default();
    s.length(char_len(slug), 5..=50, "too short", "too long");
    s.check(is_valid_slug(slug), 30, "valid format", Some("invalid format"));
    s.check(!slug.contains("--"), 20, "no double dashes", Some("double dashes"));
    s.check(
        !slug.starts_with('-') && !slug.ends_with('-'),
        10,
        "clean edges",
        Some("starts or ends with a dash"),
    );
    s.finish()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoReport {
    pub title: FieldScore,
    pub description: FieldScore,
    pub keywords: FieldScore,
    pub slug: FieldScore,
    pub overall: u32,
}

pub fn analyze(fields: &SeoFields) -> SeoReport {
    let title = analyze_title(&fields.title);
    let description = analyze_description(&fields.description);
    let keywords = analyze_keywords(&fields.keywords);
    let slug = analyze_slug(&fields.slug);
    let sum = title.score + description.score + keywords.score + slug.score;
    let overall = (sum as f64 / 4.0).round() as u32;

    SeoReport {
        title,
        description,
        keywords,
        slug,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Visual Studio Code"), "visual-studio-code");
        assert_eq!(slugify("  Logic Pro X!! "), "logic-pro-x");
        assert_eq!(slugify("a -- b"), "a-b");
        // Non-ASCII letters are dropped, not transliterated
        assert_eq!(slugify("Ücretsiz Müzik"), "cretsiz-mzik");
        assert!(is_valid_slug(&slugify("DaVinci Resolve 18.5")));
    }

    #[test]
    fn test_validate_collects_every_violation() {
        let fields = SeoFields {
            title: "x".repeat(61),
            description: "y".repeat(161),
            keywords: "z".repeat(201),
            slug: "Bad Slug".to_string(),
            image_alt: String::new(),
        };
        assert_eq!(validate(&fields).len(), 4);

        let ok = SeoFields {
            title: "ş".repeat(60),
            slug: "good-slug-1".to_string(),
            ..SeoFields::default()
        };
        assert!(validate(&ok).is_empty());
    }

    #[test]
    fn test_counter_levels() {
        assert_eq!(counter_level(&"a".repeat(48), SeoField::Title), CounterLevel::Ok);
        assert_eq!(counter_level(&"a".repeat(49), SeoField::Title), CounterLevel::Warning);
        assert_eq!(counter_level(&"a".repeat(55), SeoField::Title), CounterLevel::Danger);
    }

    #[test]
    fn test_meta_tag_defaults() {
        let mut item = Item::new("Sketch", "Grafik ve Tasarım");
        let tags = meta_tags(&item);
        assert_eq!(tags.title, "Sketch - Ücretsiz Mac Uygulaması | MacFreeApps");
        assert_eq!(tags.keywords, "Sketch, mac, uygulama, ücretsiz, Grafik ve Tasarım");
        assert_eq!(tags.slug, "sketch");
        assert!(tags.description.starts_with("Sketch ücretsiz Mac"));

        item.description = Some("Vector design tool".to_string());
        item.seo_title = Some(String::new());
        let tags = meta_tags(&item);
        assert_eq!(tags.description, "Vector design tool");
        assert!(tags.title.starts_with("Sketch - "));
    }

    #[test]
    fn test_auto_title_shortening() {
        assert_eq!(
            auto_title("Sketch", "Grafik ve Tasarım"),
            "Sketch - Mac Tasarım Uygulaması | MacFreeApps"
        );
        let thirty = "abcdefghij".repeat(3);
        assert_eq!(
            auto_title(&thirty, "Oyunlar"),
            format!("{} Mac Uygulaması | MacFreeApps", thirty)
        );
        let forty = "abcdefghij".repeat(4);
        assert_eq!(auto_title(&forty, "Oyunlar"), format!("{} | MacFreeApps", forty));
        assert_eq!(auto_title("", "Oyunlar"), "");
    }

    #[test]
    fn test_auto_description() {
        assert_eq!(
            auto_description("Sketch", "Grafik ve Tasarım", "Dijital tasarım aracı."),
            "Mac için tasarım uygulaması Sketch. Dijital tasarım aracı. MacFreeApps ile ücretsiz indirin."
        );
        assert_eq!(
            auto_description("Foo", "Bilinmeyen", ""),
            "Mac uygulaması Foo. Foo hakkında detaylı bilgi MacFreeApps ile ücretsiz indirin."
        );
        let long = "w".repeat(200);
        assert_eq!(
            auto_description("Foo", "Oyunlar", &long),
            "Mac için ücretsiz oyun Foo. MacFreeApps ile ücretsiz indirin."
        );
    }

    #[test]
    fn test_auto_keywords_order_and_cap() {
        assert_eq!(
            auto_keywords("Visual Studio Code", "Programlar", "Kod editörü"),
            "mac, uygulama, ücretsiz, indir, macfreeapps, visual, studio, code, program, software"
        );

        let keywords = auto_keywords(
            "Foo",
            "",
            "Great tool for editing photos quickly and easily",
        );
        assert!(keywords.ends_with("foo, great, tool, editing, photos"));
        assert!(!keywords.contains("quickly"));
        assert_eq!(keywords.split(", ").count(), 10);
    }

    #[test]
    fn test_image_alt_and_featured_heuristic() {
        assert_eq!(
            auto_image_alt("Logic Pro", "Müzik"),
            "Mac uygulaması Logic Pro ekran görüntüsü"
        );
        assert!(should_feature("Chess", "Oyunlar", ""));
        assert!(should_feature("Notes", "Verimlilik", "En popüler not uygulaması"));
        assert!(should_feature("Notes", "Verimlilik", &"x".repeat(101)));
        assert!(!should_feature("Notes", "Verimlilik", "Basit notlar"));
    }

    #[test]
    fn test_auto_fill_sets_fields() {
        let mut item = Item::new("Sketch", "Grafik ve Tasarım").with_description("Dijital tasarım");
        auto_fill(&mut item);
        assert_eq!(item.seo_slug.as_deref(), Some("sketch"));
        assert!(item.featured);
        assert!(validate(&SeoFields::from_item(&item)).is_empty());
    }

    #[test]
    fn test_analysis_scores() {
        let fields = SeoFields {
            title: "Sketch - Mac Tasarım Uygulaması | MacFreeApps".to_string(),
            description: String::new(),
            keywords: "mac, uygulama, ücretsiz, indir, macfreeapps".to_string(),
            slug: "sketch".to_string(),
            image_alt: String::new(),
        };
        let report = analyze(&fields);
        assert_eq!(report.title.score, 80);
        assert_eq!(report.description.score, 0);
        assert_eq!(report.keywords.score, 100);
        assert_eq!(report.slug.score, 100);
        assert_eq!(report.overall, 70);

        let bad = analyze_slug("-bad--Slug");
        assert_eq!(bad.score, 40);
        assert!(bad.feedback.contains("invalid format"));
    }
}
