use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Manual badge shown on a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeType {
    #[default]
    None,
    New,
    Updated,
}

impl BadgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeType::None => "none",
            BadgeType::New => "new",
            BadgeType::Updated => "updated",
        }
    }

    /// Short label for table and grid cells
    pub fn label(&self) -> &'static str {
        match self {
            BadgeType::None => "-",
            BadgeType::New => "NEW",
            BadgeType::Updated => "UPDATED",
        }
    }
}

impl fmt::Display for BadgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(BadgeType::None),
            "new" => Ok(BadgeType::New),
            "updated" => Ok(BadgeType::Updated),
            other => Err(format!("unknown badge type '{}'", other)),
        }
    }
}

// Older records carry null or free-form badge values; those mean "no badge".
fn lenient_badge<'de, D>(deserializer: D) -> Result<BadgeType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| s.parse().ok())
        .unwrap_or(BadgeType::None))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<bool> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or(false))
}

/// One catalog entry. `name` is the primary key within a collection.
///
/// Fields the console never edits are kept in `extra` so a full-item update
/// sends back everything the server gave us.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,

    #[serde(default, deserialize_with = "lenient_badge")]
    pub badge_type: BadgeType,

    #[serde(default, deserialize_with = "null_as_false")]
    pub featured: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_keywords: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_slug: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_image_alt: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_images: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub system_requirements: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_badge(mut self, badge: BadgeType) -> Self {
        self.badge_type = badge;
        self
    }

    pub fn with_creation_date(mut self, date: impl Into<String>) -> Self {
        self.creation_date = Some(date.into());
        self
    }

    /// Parsed `creationDate`, if present and valid RFC 3339
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.creation_date.as_deref()?)
    }

    pub fn modified_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.last_modified.as_deref()?)
    }

    /// Newest of creation and modification time
    pub fn last_activity(&self) -> Option<DateTime<FixedOffset>> {
        match (self.created_at(), self.modified_at()) {
            (Some(c), Some(m)) => Some(c.max(m)),
            (c, m) => c.or(m),
        }
    }

    /// Creation date as `dd.mm.yyyy` for table cells
    pub fn display_date(&self) -> String {
        self.created_at()
            .map(|d| d.format("%d.%m.%Y").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    // Python's isoformat() omits the offset for naive datetimes
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(&format!("{}Z", raw)))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_camel_case_and_extras() {
        let item: Item = serde_json::from_value(json!({
            "name": "Sketch",
            "category": "Grafik ve Tasarım",
            "badgeType": "new",
            "downloadUrl": "https://www.sketch.com/",
            "reviews": [],
            "installation": ["Open the DMG"]
        }))
        .unwrap();

        assert_eq!(item.badge_type, BadgeType::New);
        assert_eq!(item.download_url.as_deref(), Some("https://www.sketch.com/"));
        assert!(!item.featured);
        assert!(item.extra.contains_key("reviews"));
        assert!(item.extra.contains_key("installation"));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["installation"], json!(["Open the DMG"]));
        assert_eq!(back["badgeType"], json!("new"));
    }

    #[test]
    fn test_lenient_fields() {
        let item: Item = serde_json::from_value(json!({
            "name": "Odd",
            "category": null,
            "badgeType": "sparkly",
            "featured": null
        }))
        .unwrap();
        assert_eq!(item.category, "");
        assert_eq!(item.badge_type, BadgeType::None);
        assert!(!item.featured);
    }

    #[test]
    fn test_last_activity_prefers_newest() {
        let mut item = Item::new("A", "X").with_creation_date("2024-01-01T00:00:00+00:00");
        item.last_modified = Some("2024-03-01T10:00:00.123456".to_string());
        let newest = item.last_activity().unwrap();
        assert_eq!(newest.format("%Y-%m-%d").to_string(), "2024-03-01");
        assert_eq!(item.display_date(), "01.01.2024");
    }
}
