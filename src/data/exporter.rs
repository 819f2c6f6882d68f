use anyhow::{anyhow, Result};
use chrono::Local;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::item::Item;
use crate::analytics::AnalyticsReport;

const CSV_HEADERS: [&str; 10] = [
    "name",
    "category",
    "badgeType",
    "featured",
    "version",
    "fileSize",
    "creationDate",
    "downloadUrl",
    "website",
    "seoSlug",
];

/// Writes the filtered items of a view to CSV or JSON
pub struct DataExporter;

impl DataExporter {
    /// `catalog_YYYYmmdd_HHMMSS.<ext>` in the working directory
    pub fn default_filename(extension: &str) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("catalog_{}.{}", timestamp, extension))
    }

    /// Export to CSV or JSON depending on the file extension
    pub fn export(items: &[&Item], path: &Path) -> Result<String> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::export_to_json(items, path),
            Some("csv") | None => Self::export_to_csv(items, path),
            Some(other) => Err(anyhow!("Unsupported export format '.{}'", other)),
        }
    }

    pub fn export_to_csv(items: &[&Item], path: &Path) -> Result<String> {
        if items.is_empty() {
            return Err(anyhow!("No data to export"));
        }

        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(CSV_HEADERS)?;

        for item in items {
            let opt = |v: &Option<String>| v.clone().unwrap_or_default();
            wtr.write_record([
                item.name.clone(),
                item.category.clone(),
                item.badge_type.to_string(),
                item.featured.to_string(),
                opt(&item.version),
                opt(&item.file_size),
                opt(&item.creation_date),
                opt(&item.download_url),
                opt(&item.website),
                opt(&item.seo_slug),
            ])?;
        }
        wtr.flush()?;

        Ok(format!("Exported {} rows to {}", items.len(), path.display()))
    }

    /// Full items, including fields the console does not know about
    pub fn export_to_json(items: &[&Item], path: &Path) -> Result<String> {
        if items.is_empty() {
            return Err(anyhow!("No data to export"));
        }

        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, items)?;

        Ok(format!("Exported {} items to {}", items.len(), path.display()))
    }

    /// Pretty JSON of the full analytics report
    pub fn export_analytics(report: &AnalyticsReport, path: &Path) -> Result<String> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, report)?;
        Ok(format!("Wrote analytics report to {}", path.display()))
    }
}
