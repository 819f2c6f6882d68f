//! Content checks over catalog items: suspicious wording, spam and
//! missing or malformed data.

use reqwest::Url;
use serde::Serialize;

use crate::data::item::Item;

const MAX_NAME_LEN: usize = 50;
const MIN_DESCRIPTION_LEN: usize = 10;
const MAX_DESCRIPTION_LEN: usize = 1000;

const SUSPICIOUS_KEYWORDS: [&str; 6] = ["free download", "crack", "hack", "cheat", "mod", "unlimited"];

const SPAM_INDICATORS: [&str; 9] = [
    "free download",
    "crack",
    "hack",
    "cheat",
    "mod apk",
    "unlimited",
    "premium free",
    "no ads",
    "unlocked",
];

/// Two or more indicators mark an item as spam
const SPAM_THRESHOLD: usize = 2;

/// Which check `scan` runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Content,
    Spam,
    Validation,
}

impl std::str::FromStr for Check {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scan" | "content" => Ok(Check::Content),
            "spam" => Ok(Check::Spam),
            "validate" | "validation" => Ok(Check::Validation),
            other => Err(format!("unknown check '{}'", other)),
        }
    }
}

/// One item that failed a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flagged {
    pub name: String,
    pub issues: Vec<String>,
}

/// Every check for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub name: String,
    pub category: String,
    pub content_issues: Vec<String>,
    pub validation_errors: Vec<String>,
    pub spam: bool,
}

impl Finding {
    pub fn is_clean(&self) -> bool {
        self.content_issues.is_empty() && self.validation_errors.is_empty() && !self.spam
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationReport {
    pub total: usize,
    /// Items with at least one content issue
    pub issues_found: usize,
    pub spam_count: usize,
    /// Items with at least one validation error
    pub missing_data: usize,
    /// Only the items that failed something
    pub findings: Vec<Finding>,
}

fn searchable_text(item: &Item) -> String {
    format!(
        "{} {}",
        item.name,
        item.description.as_deref().unwrap_or_default()
    )
    .to_lowercase()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Length and wording problems in name and description
pub fn analyze_content(item: &Item) -> Vec<String> {
    let mut issues = Vec::new();

    if item.name.chars().count() > MAX_NAME_LEN {
        issues.push("Name is too long".to_string());
    }
    if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
        let len = description.chars().count();
        if len < MIN_DESCRIPTION_LEN {
            issues.push("Description is too short".to_string());
        }
        if len > MAX_DESCRIPTION_LEN {
            issues.push("Description is too long".to_string());
        }
    }

    let text = searchable_text(item);
    for keyword in SUSPICIOUS_KEYWORDS {
        if text.contains(keyword) {
            issues.push(format!("Suspicious word: {}", keyword));
        }
    }

    issues
}

pub fn spam_indicators(item: &Item) -> Vec<&'static str> {
    let text = searchable_text(item);
    SPAM_INDICATORS
        .into_iter()
        .filter(|keyword| text.contains(keyword))
        .collect()
}

pub fn is_spam(item: &Item) -> bool {
    spam_indicators(item).len() >= SPAM_THRESHOLD
}

/// Required fields and URL shape
pub fn validate_data(item: &Item) -> Vec<String> {
    let mut errors = Vec::new();

    if item.name.trim().is_empty() {
        errors.push("Name is missing".to_string());
    }
    if item.category.trim().is_empty() {
        errors.push("Category is missing".to_string());
    }
    if non_blank(&item.description).is_none() {
        errors.push("Description is missing".to_string());
    }
    if !item.website.as_deref().is_some_and(is_valid_url) {
        errors.push("Invalid website URL".to_string());
    }
    if let Some(image) = item.image.as_deref().filter(|i| !i.is_empty()) {
        if !is_valid_url(image) {
            errors.push("Invalid image URL".to_string());
        }
    }

    errors
}

/// Items failing `check`, in the order given
pub fn scan<'a>(items: impl IntoIterator<Item = &'a Item>, check: Check) -> Vec<Flagged> {
    items
        .into_iter()
        .filter_map(|item| {
            let issues = match check {
                Check::Content => analyze_content(item),
                Check::Spam => {
                    let hits = spam_indicators(item);
                    if hits.len() >= SPAM_THRESHOLD {
                        vec![format!("Spam content detected ({})", hits.join(", "))]
                    } else {
                        Vec::new()
                    }
                }
                Check::Validation => validate_data(item),
            };
            (!issues.is_empty()).then(|| Flagged {
                name: item.name.clone(),
                issues,
            })
        })
        .collect()
}

pub fn report<'a>(items: impl IntoIterator<Item = &'a Item>) -> ModerationReport {
    let mut report = ModerationReport {
        total: 0,
        issues_found: 0,
        spam_count: 0,
        missing_data: 0,
        findings: Vec::new(),
    };

    for item in items {
        report.total += 1;
        let finding = Finding {
            name: item.name.clone(),
            category: item.category.clone(),
            content_issues: analyze_content(item),
            validation_errors: validate_data(item),
            spam: is_spam(item),
        };
        if !finding.content_issues.is_empty() {
            report.issues_found += 1;
        }
        if finding.spam {
            report.spam_count += 1;
        }
        if !finding.validation_errors.is_empty() {
            report.missing_data += 1;
        }
        if !finding.is_clean() {
            report.findings.push(finding);
        }
    }

    tracing::debug!(
        target: "moderation",
        "Checked {} items: {} flagged",
        report.total,
        report.findings.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(name: &str) -> Item {
        let mut item = Item::new(name, "Verimlilik")
            .with_description("A tidy window manager for macOS power users");
        item.website = Some("https://rectangleapp.com/".to_string());
        item
    }

    #[test]
    fn test_content_issues() {
        let item = complete("Rectangle");
        assert!(analyze_content(&item).is_empty());

        let long_name = complete(&"x".repeat(51));
        assert_eq!(analyze_content(&long_name), vec!["Name is too long"]);

        let short = complete("Rectangle").with_description("Tiny");
        assert_eq!(analyze_content(&short), vec!["Description is too short"]);

        // "mod" also matches inside longer words
        let modern = complete("Modern Editor");
        assert_eq!(analyze_content(&modern), vec!["Suspicious word: mod"]);
    }

    #[test]
    fn test_spam_needs_two_indicators() {
        let one = complete("Photo Editor").with_description("Unlimited filters for your photos");
        assert!(!is_spam(&one));

        let two = complete("Photo Editor Crack")
            .with_description("Unlimited filters, free download today");
        assert!(is_spam(&two));
        assert_eq!(spam_indicators(&two), vec!["free download", "crack", "unlimited"]);
    }

    #[test]
    fn test_validation_errors() {
        assert!(validate_data(&complete("Rectangle")).is_empty());

        let mut item = Item::new("Rectangle", " ");
        item.image = Some("not a url".to_string());
        assert_eq!(
            validate_data(&item),
            vec![
                "Category is missing",
                "Description is missing",
                "Invalid website URL",
                "Invalid image URL",
            ]
        );
    }

    #[test]
    fn test_scan_and_report_counts() {
        let items = vec![
            complete("Rectangle"),
            complete("Crack Hack Tool"),
            Item::new("Bare", "Müzik"),
        ];

        let spam = scan(&items, Check::Spam);
        assert_eq!(spam.len(), 1);
        assert_eq!(spam[0].name, "Crack Hack Tool");

        let validation = scan(&items, Check::Validation);
        assert_eq!(validation.len(), 1);
        assert_eq!(validation[0].name, "Bare");

        let report = report(&items);
        assert_eq!(report.total, 3);
        assert_eq!(report.issues_found, 1);
        assert_eq!(report.spam_count, 1);
        assert_eq!(report.missing_data, 1);
        let flagged: Vec<&str> = report.findings.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(flagged, vec!["Crack Hack Tool", "Bare"]);
    }
}
