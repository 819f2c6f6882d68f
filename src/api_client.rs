use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::data::item::Item;
use crate::error::{CatalogError, Result};

/// Body of `GET /api/apps`. The paging fields are only filled by servers
/// that paginate; `limit=0` returns everything on one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppsResponse {
    pub apps: Vec<Item>,
    #[serde(default)]
    pub current_page: Option<usize>,
    #[serde(default)]
    pub total_pages: Option<usize>,
    #[serde(default)]
    pub total_apps: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// Body of `GET /api/categories`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTree {
    #[serde(default)]
    pub hierarchy: BTreeMap<String, CategoryGroup>,
    #[serde(default)]
    pub existing: Vec<String>,
}

impl CategoryTree {
    /// Options for a category picker: every subcategory under its main
    /// category, followed by existing categories the hierarchy lacks
    pub fn suggestions(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for group in self.hierarchy.values() {
            for sub in &group.subcategories {
                if !out.contains(sub) {
                    out.push(sub.clone());
                }
            }
        }

        let mut extra: Vec<String> = self
            .existing
            .iter()
            .filter(|c| !self.hierarchy.contains_key(*c) && !out.contains(c))
            .cloned()
            .collect();
        extra.sort();
        extra.dedup();
        out.extend(extra);
        out
    }
}

#[derive(Debug, Clone, Deserialize)]
struct FeaturedResponse {
    featured: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// The REST collaborator that owns the catalog.
///
/// Implemented over HTTP by `ApiClient`; tests use in-memory fakes.
pub trait CatalogApi {
    fn list_items(&self) -> Result<Vec<Item>>;
    fn create_item(&self, item: &Item) -> Result<Item>;
    fn update_item(&self, original_name: &str, item: &Item) -> Result<Item>;
    fn delete_item(&self, name: &str) -> Result<()>;
    /// Returns the featured flag the server ended up with
    fn set_featured(&self, name: &str, featured: bool) -> Result<bool>;
    fn categories(&self) -> Result<CategoryTree>;
    fn scrape(&self, url: &str) -> Result<Item>;
}

impl<T: CatalogApi + ?Sized> CatalogApi for Box<T> {
    fn list_items(&self) -> Result<Vec<Item>> {
        (**self).list_items()
    }

    fn create_item(&self, item: &Item) -> Result<Item> {
        (**self).create_item(item)
    }

    fn update_item(&self, original_name: &str, item: &Item) -> Result<Item> {
        (**self).update_item(original_name, item)
    }

    fn delete_item(&self, name: &str) -> Result<()> {
        (**self).delete_item(name)
    }

    fn set_featured(&self, name: &str, featured: bool) -> Result<bool> {
        (**self).set_featured(name, featured)
    }

    fn categories(&self) -> Result<CategoryTree> {
        (**self).categories()
    }

    fn scrape(&self, url: &str) -> Result<Item> {
        (**self).scrape(url)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::NetworkUnavailable(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// URL of the full-list request, also used as the cache key
    pub fn list_url(&self) -> Result<Url> {
        let mut url = self.endpoint(&["api", "apps"])?;
        url.query_pairs_mut().append_pair("limit", "0");
        Ok(url)
    }

    /// Base URL plus percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<Response> {
        request.send().map_err(|e| {
            tracing::warn!(target: "api", "Request failed: {}", e);
            CatalogError::NetworkUnavailable(e.to_string())
        })
    }

    /// Turn non-2xx responses into errors. `name` is reported on 409.
    fn check(response: Response, name: Option<&str>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::CONFLICT {
            return Err(CatalogError::Conflict(name.unwrap_or_default().to_string()));
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(name) = name {
                return Err(CatalogError::NotFound(name.to_string()));
            }
        }

        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string());
        tracing::warn!(target: "api", "HTTP {}: {}", status.as_u16(), message);
        Err(CatalogError::Http {
            status: status.as_u16(),
            message,
        })
    }

    fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let body = response
            .text()
            .map_err(|e| CatalogError::NetworkUnavailable(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl CatalogApi for ApiClient {
    fn list_items(&self) -> Result<Vec<Item>> {
        let url = self.list_url()?;
        tracing::info!(target: "api", "GET {}", url);
        let response = Self::check(self.send(self.client.get(url))?, None)?;
        let body: AppsResponse = Self::decode(response)?;
        tracing::debug!(target: "api", "Received {} items", body.apps.len());
        Ok(body.apps)
    }

    fn create_item(&self, item: &Item) -> Result<Item> {
        let url = self.endpoint(&["api", "apps"])?;
        tracing::info!(target: "api", "POST {} ({})", url, item.name);
        let response = Self::check(self.send(self.client.post(url).json(item))?, Some(&item.name))?;
        Self::decode(response)
    }

    fn update_item(&self, original_name: &str, item: &Item) -> Result<Item> {
        let url = self.endpoint(&["api", "apps", original_name])?;
        tracing::info!(target: "api", "PUT {}", url);
        let response = self.send(self.client.put(url).json(item))?;
        // A 409 here means the new name is taken, a 404 that the old one is gone
        let response = match response.status() {
            StatusCode::CONFLICT => return Err(CatalogError::Conflict(item.name.clone())),
            _ => Self::check(response, Some(original_name))?,
        };
        Self::decode(response)
    }

    fn delete_item(&self, name: &str) -> Result<()> {
        let url = self.endpoint(&["api", "apps", name])?;
        tracing::info!(target: "api", "DELETE {}", url);
        Self::check(self.send(self.client.delete(url))?, Some(name))?;
        Ok(())
    }

    fn set_featured(&self, name: &str, featured: bool) -> Result<bool> {
        let url = self.endpoint(&["api", "apps", name, "featured"])?;
        tracing::info!(target: "api", "PUT {} featured={}", url, featured);
        let body = serde_json::json!({ "featured": featured });
        let response = Self::check(self.send(self.client.put(url).json(&body))?, Some(name))?;
        let reply: FeaturedResponse = Self::decode(response)?;
        Ok(reply.featured)
    }

    fn categories(&self) -> Result<CategoryTree> {
        let url = self.endpoint(&["api", "categories"])?;
        tracing::info!(target: "api", "GET {}", url);
        let response = Self::check(self.send(self.client.get(url))?, None)?;
        Self::decode(response)
    }

    fn scrape(&self, url: &str) -> Result<Item> {
        let endpoint = self.endpoint(&["api", "scrape-url"])?;
        tracing::info!(target: "api", "POST {} url={}", endpoint, url);
        let body = serde_json::json!({ "url": url });
        let response = Self::check(self.send(self.client.post(endpoint).json(&body))?, None)?;
        let fields: Value = Self::decode(response)?;
        Ok(serde_json::from_value(fields)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_names() {
        let client = ApiClient::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        let url = client.endpoint(&["api", "apps", "Logic Pro/X"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/apps/Logic%20Pro%2FX");
        assert_eq!(
            client.list_url().unwrap().as_str(),
            "http://localhost:5000/api/apps?limit=0"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new("not a url", Duration::from_secs(5)).err().unwrap();
        assert!(matches!(err, CatalogError::InvalidUrl(_)));
    }

    #[test]
    fn test_category_suggestions() {
        let tree: CategoryTree = serde_json::from_value(serde_json::json!({
            "hierarchy": {
                "Oyunlar": { "subcategories": ["Aksiyon", "Bulmaca"] },
                "Programlar": { "subcategories": ["Müzik", "İş"] }
            },
            "existing": ["Müzik", "Kategorisiz", "Oyunlar", "Eski"]
        }))
        .unwrap();

        assert_eq!(
            tree.suggestions(),
            vec!["Aksiyon", "Bulmaca", "Müzik", "İş", "Eski", "Kategorisiz"]
        );
    }
}
