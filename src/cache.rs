use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::data::item::Item;
use crate::error::Result;
use crate::utils::app_paths::AppPaths;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedList {
    pub id: u64,
    pub url_hash: String,
    pub source_url: String,
    pub fetched_at: DateTime<Local>,
    pub item_count: usize,
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub lists: Vec<CachedList>,
    pub next_id: u64,
}

/// Items read back from the cache
#[derive(Debug, Clone)]
pub struct CachedItems {
    pub items: Vec<Item>,
    pub fetched_at: DateTime<Local>,
}

/// On-disk copies of fetched lists, one per request URL
pub struct ListCache {
    cache_dir: PathBuf,
    metadata_path: PathBuf,
    metadata: CacheMetadata,
}

impl ListCache {
    /// Open the cache in the platform cache directory
    pub fn new() -> Result<Self> {
        Self::open(&AppPaths::cache_dir()?)
    }

    pub fn open(cache_dir: &Path) -> Result<Self> {
        let data_dir = cache_dir.join("data");
        fs::create_dir_all(&data_dir)?;

        let metadata_path = cache_dir.join("metadata.json");
        let metadata = if metadata_path.exists() {
            let content = fs::read_to_string(&metadata_path)?;
            serde_json::from_str(&content)?
        } else {
            CacheMetadata {
                lists: Vec::new(),
                next_id: 1,
            }
        };

        Ok(Self {
            cache_dir: cache_dir.to_path_buf(),
            metadata_path,
            metadata,
        })
    }

    fn hash_url(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Save `items` as the latest copy of `url`, replacing any older copy
    pub fn store(&mut self, url: &str, items: &[Item]) -> Result<u64> {
        self.store_at(url, items, Local::now())
    }

    pub fn store_at(&mut self, url: &str, items: &[Item], now: DateTime<Local>) -> Result<u64> {
        let url_hash = Self::hash_url(url);
        let (id, filename) = match self.metadata.lists.iter().find(|l| l.url_hash == url_hash) {
            Some(existing) => (existing.id, existing.file_path.clone()),
            None => {
                let id = self.metadata.next_id;
                self.metadata.next_id += 1;
                (id, format!("list_{:06}.json", id))
            }
        };

        let file_path = self.cache_dir.join("data").join(&filename);
        fs::write(&file_path, serde_json::to_string_pretty(items)?)?;

        self.metadata.lists.retain(|l| l.url_hash != url_hash);
        self.metadata.lists.push(CachedList {
            id,
            url_hash,
            source_url: url.to_string(),
            fetched_at: now,
            item_count: items.len(),
            file_path: filename,
        });
        self.save_metadata()?;

        tracing::debug!(target: "cache", "Stored {} items for {} as entry {}", items.len(), url, id);
        Ok(id)
    }

    /// The cached copy of `url` if it is younger than `max_age`
    pub fn get_fresh(&self, url: &str, max_age: Duration) -> Result<Option<CachedItems>> {
        self.get_fresh_at(url, max_age, Local::now())
    }

    pub fn get_fresh_at(
        &self,
        url: &str,
        max_age: Duration,
        now: DateTime<Local>,
    ) -> Result<Option<CachedItems>> {
        match self.entry(url) {
            Some(entry) if now - entry.fetched_at <= max_age => self.read_entry(entry).map(Some),
            _ => Ok(None),
        }
    }

    /// The cached copy of `url` regardless of age
    pub fn get_any(&self, url: &str) -> Result<Option<CachedItems>> {
        match self.entry(url) {
            Some(entry) => self.read_entry(entry).map(Some),
            None => Ok(None),
        }
    }

    fn entry(&self, url: &str) -> Option<&CachedList> {
        let url_hash = Self::hash_url(url);
        self.metadata.lists.iter().find(|l| l.url_hash == url_hash)
    }

    fn read_entry(&self, entry: &CachedList) -> Result<CachedItems> {
        let file_path = self.cache_dir.join("data").join(&entry.file_path);
        let json_data = fs::read_to_string(file_path)?;
        let items: Vec<Item> = serde_json::from_str(&json_data)?;
        Ok(CachedItems {
            items,
            fetched_at: entry.fetched_at,
        })
    }

    pub fn list_entries(&self) -> &[CachedList] {
        &self.metadata.lists
    }

    /// Drop one entry. Returns `false` when no entry has that id.
    pub fn delete(&mut self, id: u64) -> Result<bool> {
        let Some(pos) = self.metadata.lists.iter().position(|l| l.id == id) else {
            return Ok(false);
        };
        let entry = self.metadata.lists.remove(pos);
        let file_path = self.cache_dir.join("data").join(&entry.file_path);
        if file_path.exists() {
            fs::remove_file(file_path)?;
        }
        self.save_metadata()?;
        tracing::debug!(target: "cache", "Deleted entry {} ({})", id, entry.source_url);
        Ok(true)
    }

    pub fn clear_all(&mut self) -> Result<()> {
        let data_dir = self.cache_dir.join("data");
        for entry in fs::read_dir(data_dir)? {
            let entry = entry?;
            if entry.path().extension().map_or(false, |ext| ext == "json") {
                fs::remove_file(entry.path())?;
            }
        }

        self.metadata.lists.clear();
        self.metadata.next_id = 1;
        self.save_metadata()?;
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        let total_size: u64 = self
            .metadata
            .lists
            .iter()
            .filter_map(|l| {
                let path = self.cache_dir.join("data").join(&l.file_path);
                fs::metadata(path).ok().map(|m| m.len())
            })
            .sum();

        CacheStats {
            total_lists: self.metadata.lists.len(),
            total_items: self.metadata.lists.iter().map(|l| l.item_count).sum(),
            total_size_bytes: total_size,
            oldest_entry: self.metadata.lists.iter().map(|l| l.fetched_at).min(),
            newest_entry: self.metadata.lists.iter().map(|l| l.fetched_at).max(),
        }
    }

    fn save_metadata(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.metadata)?;
        fs::write(&self.metadata_path, json)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct CacheStats {
    pub total_lists: usize,
    pub total_items: usize,
    pub total_size_bytes: u64,
    pub oldest_entry: Option<DateTime<Local>>,
    pub newest_entry: Option<DateTime<Local>>,
}

impl CacheStats {
    pub fn format_size(&self) -> String {
        let size = self.total_size_bytes as f64;
        if size < 1024.0 {
            format!("{} B", size)
        } else if size < 1024.0 * 1024.0 {
            format!("{:.1} KB", size / 1024.0)
        } else {
            format!("{:.1} MB", size / (1024.0 * 1024.0))
        }
    }
}

/// Where the full list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Always ask the server; the cache only covers outages
    #[default]
    Live,
    /// Never touch the network
    Cached,
    /// Serve a fresh cache entry, otherwise revalidate against the server
    Hybrid,
}

impl FromStr for FetchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(FetchMode::Live),
            "cached" => Ok(FetchMode::Cached),
            "hybrid" => Ok(FetchMode::Hybrid),
            other => Err(format!("unknown fetch mode '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn items(names: &[&str]) -> Vec<Item> {
        names.iter().map(|n| Item::new(*n, "Utilities")).collect()
    }

    #[test]
    fn test_store_replaces_previous_copy() {
        let dir = TempDir::new().unwrap();
        let mut cache = ListCache::open(dir.path()).unwrap();
        let url = "http://localhost:5000/api/apps?limit=0";

        let first = cache.store(url, &items(&["A", "B"])).unwrap();
        let second = cache.store(url, &items(&["C"])).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.list_entries().len(), 1);

        let cached = cache.get_any(url).unwrap().unwrap();
        assert_eq!(cached.items.len(), 1);
        assert_eq!(cached.items[0].name, "C");

        // Reopening reads the same metadata back
        let reopened = ListCache::open(dir.path()).unwrap();
        assert_eq!(reopened.stats().total_items, 1);
    }

    #[test]
    fn test_freshness_window() {
        let dir = TempDir::new().unwrap();
        let mut cache = ListCache::open(dir.path()).unwrap();
        let url = "http://example.test/api/apps?limit=0";
        let fetched = Local::now();
        cache.store_at(url, &items(&["A"]), fetched).unwrap();

        let ttl = Duration::seconds(60);
        assert!(cache
            .get_fresh_at(url, ttl, fetched + Duration::seconds(30))
            .unwrap()
            .is_some());
        assert!(cache
            .get_fresh_at(url, ttl, fetched + Duration::seconds(90))
            .unwrap()
            .is_none());
        assert!(cache.get_any("http://other.test/").unwrap().is_none());
    }

    #[test]
    fn test_clear_all() {
        let dir = TempDir::new().unwrap();
        let mut cache = ListCache::open(dir.path()).unwrap();
        cache.store("a", &items(&["A"])).unwrap();
        cache.store("b", &items(&["B"])).unwrap();
        assert_eq!(cache.stats().total_lists, 2);

        cache.clear_all().unwrap();
        assert_eq!(cache.stats().total_lists, 0);
        assert!(cache.get_any("a").unwrap().is_none());
    }

    #[test]
    fn test_delete_single_entry() {
        let dir = TempDir::new().unwrap();
        let mut cache = ListCache::open(dir.path()).unwrap();
        let a = cache.store("a", &items(&["A"])).unwrap();
        cache.store("b", &items(&["B"])).unwrap();

        assert!(cache.delete(a).unwrap());
        assert!(!cache.delete(a).unwrap());
        assert!(cache.get_any("a").unwrap().is_none());
        assert_eq!(cache.get_any("b").unwrap().unwrap().items[0].name, "B");
        assert_eq!(ListCache::open(dir.path()).unwrap().list_entries().len(), 1);
    }
}
