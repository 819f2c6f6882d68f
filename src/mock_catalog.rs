//! Built-in copy of the static mock endpoints.
//!
//! Used when the catalog server cannot be reached, and by `--offline`.
//! Read-only: every write answers with HTTP 405.

use std::collections::BTreeMap;

use crate::api_client::{AppsResponse, CatalogApi, CategoryGroup, CategoryTree};
use crate::data::item::{BadgeType, Item};
use crate::error::{CatalogError, Result};

/// Category value meaning "no category constraint" on the public site
pub const ALL_CATEGORIES: &str = "Tümü";

const DEFAULT_LIMIT: usize = 20;

/// Query string of the mock `apps` function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockQuery {
    pub page: usize,
    /// Zero means "everything on one page"
    pub limit: usize,
    pub search: String,
    pub category: String,
    /// `name-asc`, `name-desc`, anything else keeps the stored order
    pub sort: String,
}

impl Default for MockQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
            sort: "default".to_string(),
        }
    }
}

/// Names the mock `featured-apps` function returns
const FEATURED: [&str; 3] = ["DaVinci Resolve Studio", "Visual Studio Code", "Logic Pro"];

pub struct MockCatalog {
    apps: Vec<Item>,
    categories: CategoryTree,
}

impl MockCatalog {
    pub fn builtin() -> Self {
        let mut apps = vec![
            app(
                "DaVinci Resolve Studio",
                "Fotoğraf ve Video",
                "18.5",
                "5.1 GB",
                "Profesyonel video düzenleme yazılımı. Hollywood kalitesinde post-production araçları sunar.",
                "https://www.blackmagicdesign.com/products/davinciresolve",
                BadgeType::New,
            ),
            app(
                "Visual Studio Code",
                "Geliştirici Araçları",
                "1.85",
                "200 MB",
                "Microsoft tarafından geliştirilen ücretsiz kod editörü. Modern web ve bulut uygulamaları geliştirmek için tasarlanmıştır.",
                "https://code.visualstudio.com/",
                BadgeType::Updated,
            ),
            app(
                "Sketch",
                "Grafik ve Tasarım",
                "98.2",
                "45 MB",
                "Dijital tasarım için profesyonel araç. UI/UX tasarımcıları için özel olarak geliştirilmiştir.",
                "https://www.sketch.com/",
                BadgeType::New,
            ),
            app(
                "Logic Pro",
                "Müzik",
                "10.7.9",
                "6.2 GB",
                "Apple'ın profesyonel müzik üretim yazılımı. Kayıt, düzenleme ve miksaj için kapsamlı araçlar sunar.",
                "https://www.apple.com/logic-pro/",
                BadgeType::Updated,
            ),
        ];

        for item in apps.iter_mut() {
            item.featured = FEATURED.contains(&item.name.as_str());
        }

        let mut hierarchy = BTreeMap::new();
        hierarchy.insert(
            "Oyunlar".to_string(),
            group(&[
                "Aksiyon", "Macera", "Masa Oyunları", "Kart Oyunları", "Kumarhane Oyunları",
                "Basit Eğlence", "Aile", "Müzik Oyunları", "Bulmaca", "Yarış", "Rol Yapma",
                "Simülasyon", "Spor Oyunları", "Strateji", "Bilgi Yarışması", "Kelime Oyunları",
            ]),
        );
        hierarchy.insert(
            "Programlar".to_string(),
            group(&[
                "İş", "Geliştirici Araçları", "Eğitim", "Eğlence", "Finans", "Grafik ve Tasarım",
                "Sağlık ve Fitness", "Yaşam Tarzı", "Tıp", "Müzik", "Haberler", "Fotoğraf ve Video",
                "Verimlilik", "Referans", "Alışveriş", "Sosyal Ağ", "Spor", "Seyahat",
                "Yardımcı Programlar", "Hava Durumu",
            ]),
        );
        let existing = [
            "Fotoğraf ve Video", "Grafik ve Tasarım", "Müzik", "Geliştirici Araçları", "İş",
            "Eğitim", "Sağlık ve Fitness", "Yaşam Tarzı", "Verimlilik", "Haberler",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self {
            apps,
            categories: CategoryTree {
                hierarchy,
                existing,
            },
        }
    }

    pub fn apps(&self) -> &[Item] {
        &self.apps
    }

    /// Search, filter, sort and paginate like the mock endpoint
    pub fn query(&self, query: &MockQuery) -> AppsResponse {
        let needle = query.search.to_lowercase();
        let mut matched: Vec<Item> = self
            .apps
            .iter()
            .filter(|a| {
                needle.is_empty()
                    || a.name.to_lowercase().contains(&needle)
                    || a.description
                        .as_deref()
                        .map_or(false, |d| d.to_lowercase().contains(&needle))
                    || a.category.to_lowercase().contains(&needle)
            })
            .filter(|a| {
                query.category.is_empty()
                    || query.category == ALL_CATEGORIES
                    || a.category == query.category
            })
            .cloned()
            .collect();

        match query.sort.as_str() {
            "name-asc" => matched.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            "name-desc" => matched.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase())),
            _ => {}
        }

        let total = matched.len();
        let page = query.page.max(1);
        if query.limit == 0 {
            return AppsResponse {
                apps: matched,
                current_page: Some(1),
                total_pages: Some(1),
                total_apps: Some(total),
            };
        }

        let apps = matched
            .into_iter()
            .skip((page - 1) * query.limit)
            .take(query.limit)
            .collect();
        AppsResponse {
            apps,
            current_page: Some(page),
            total_pages: Some(total.div_ceil(query.limit)),
            total_apps: Some(total),
        }
    }

    fn read_only<T>(&self) -> Result<T> {
        Err(CatalogError::Http {
            status: 405,
            message: "the built-in fallback catalog is read-only".to_string(),
        })
    }
}

impl CatalogApi for MockCatalog {
    fn list_items(&self) -> Result<Vec<Item>> {
        Ok(self
            .query(&MockQuery {
                limit: 0,
                ..MockQuery::default()
            })
            .apps)
    }

    fn create_item(&self, _item: &Item) -> Result<Item> {
        self.read_only()
    }

    fn update_item(&self, _original_name: &str, _item: &Item) -> Result<Item> {
        self.read_only()
    }

    fn delete_item(&self, _name: &str) -> Result<()> {
        self.read_only()
    }

    fn set_featured(&self, _name: &str, _featured: bool) -> Result<bool> {
        self.read_only()
    }

    fn categories(&self) -> Result<CategoryTree> {
        Ok(self.categories.clone())
    }

    fn scrape(&self, _url: &str) -> Result<Item> {
        self.read_only()
    }
}

fn app(
    name: &str,
    category: &str,
    version: &str,
    size: &str,
    description: &str,
    download: &str,
    badge: BadgeType,
) -> Item {
    Item {
        version: Some(version.to_string()),
        file_size: Some(size.to_string()),
        download_url: Some(download.to_string()),
        ..Item::new(name, category)
            .with_description(description)
            .with_badge(badge)
    }
}

fn group(subcategories: &[&str]) -> CategoryGroup {
    CategoryGroup {
        subcategories: subcategories.iter().map(|s| s.to_string()).collect(),
    }
}
