//! Owner of the two list views and everything that changes them.
//!
//! Server round-trips are applied optimistically to both views and rolled
//! back when the collaborator rejects them.

use chrono::{DateTime, Local};
use reqwest::Url;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::api_client::CatalogApi;
use crate::cache::{CacheStats, CachedList, FetchMode, ListCache};
use crate::config::config::{Config, ViewKind};
use crate::data::item::{BadgeType, Item};
use crate::data::list_state::{ListState, SortKey, SortOrder};
use crate::debouncer::SearchDebouncer;
use crate::error::{CatalogError, Result};
use crate::mock_catalog::MockCatalog;
use crate::preferences::{Preferences, Theme};
use crate::search_filter::SearchFilter;
use crate::seo::{self, SeoFields};

/// Tunables the controller takes from the config file
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub admin_per_page: usize,
    pub public_per_page: usize,
    pub search_debounce_ms: u64,
    pub cache_ttl: chrono::Duration,
    pub fetch_mode: FetchMode,
    pub use_fallback: bool,
    pub max_similar: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            admin_per_page: config.pagination.admin_per_page,
            public_per_page: config.pagination.public_per_page,
            search_debounce_ms: config.behavior.search_debounce_ms,
            cache_ttl: chrono::Duration::seconds(config.behavior.cache_ttl_secs as i64),
            fetch_mode: config.api.fetch_mode,
            use_fallback: config.behavior.use_fallback,
            max_similar: config.behavior.max_similar,
        }
    }
}

/// Where the data of the last refresh came from
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Server,
    FreshCache(DateTime<Local>),
    StaleCache(DateTime<Local>),
    Fallback,
}

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub source: DataSource,
    pub count: usize,
    /// Set when the list is not live server data
    pub warning: Option<String>,
}

/// Per-item results of a bulk edit over the selection
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, CatalogError)>,
}

impl BulkOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct CatalogController<A: CatalogApi = Box<dyn CatalogApi>> {
    api: A,
    admin: ListState,
    public: ListState,
    active: ViewKind,
    cache: Option<(ListCache, String)>,
    preferences: Preferences,
    preferences_path: Option<PathBuf>,
    favorites_only: bool,
    selection: BTreeSet<String>,
    search: SearchDebouncer,
    settings: ControllerSettings,
}

impl<A: CatalogApi> CatalogController<A> {
    pub fn new(api: A, settings: ControllerSettings) -> Self {
        let admin = ListState::new(settings.admin_per_page)
            .with_sort(SortKey::CreationDate, SortOrder::Desc);
        let public =
            ListState::new(settings.public_per_page).with_sort(SortKey::Recent, SortOrder::Desc);

        Self {
            api,
            admin,
            public,
            active: ViewKind::Admin,
            cache: None,
            preferences: Preferences::default(),
            preferences_path: None,
            favorites_only: false,
            selection: BTreeSet::new(),
            search: SearchDebouncer::new(settings.search_debounce_ms),
            settings,
        }
    }

    /// Keep fetched lists in `cache` under `key` (the list request URL)
    pub fn with_cache(mut self, cache: ListCache, key: impl Into<String>) -> Self {
        self.cache = Some((cache, key.into()));
        self
    }

    /// Use `preferences`, writing changes back to `path` when given
    pub fn with_preferences(mut self, preferences: Preferences, path: Option<PathBuf>) -> Self {
        self.preferences = preferences;
        self.preferences_path = path;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn admin(&self) -> &ListState {
        &self.admin
    }

    pub fn public(&self) -> &ListState {
        &self.public
    }

    pub fn active_view(&self) -> ViewKind {
        self.active
    }

    pub fn set_active_view(&mut self, view: ViewKind) -> bool {
        if self.active == view {
            return false;
        }
        self.search.cancel();
        self.active = view;
        true
    }

    /// The view that navigation, search and filters apply to
    pub fn view(&self) -> &ListState {
        match self.active {
            ViewKind::Admin => &self.admin,
            ViewKind::Public => &self.public,
        }
    }

    pub fn view_mut(&mut self) -> &mut ListState {
        match self.active {
            ViewKind::Admin => &mut self.admin,
            ViewKind::Public => &mut self.public,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    fn views_mut(&mut self) -> [&mut ListState; 2] {
        [&mut self.admin, &mut self.public]
    }

    fn load_all(&mut self, items: Vec<Item>) {
        self.public.load(items.clone());
        self.admin.load(items);
        self.selection.retain(|name| self.admin.get(name).is_some());
    }

    // ---- Cache maintenance ----

    /// `None` when running without a cache
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|(cache, _)| cache.stats())
    }

    pub fn cache_entries(&self) -> &[CachedList] {
        match &self.cache {
            Some((cache, _)) => cache.list_entries(),
            None => &[],
        }
    }

    /// Empty the cache. Returns `false` when there is none.
    pub fn clear_cache(&mut self) -> Result<bool> {
        let Some((cache, _)) = self.cache.as_mut() else {
            return Ok(false);
        };
        cache.clear_all()?;
        tracing::info!(target: "controller", "Cache cleared");
        Ok(true)
    }

    pub fn drop_cache_entry(&mut self, id: u64) -> Result<bool> {
        match self.cache.as_mut() {
            Some((cache, _)) => cache.delete(id),
            None => Ok(false),
        }
    }

    // ---- Fetching ----

    /// Reload both views according to the configured fetch mode
    pub fn refresh(&mut self) -> Result<RefreshOutcome> {
        if self.settings.fetch_mode == FetchMode::Hybrid {
            if let Some(outcome) = self.load_fresh_cache() {
                return Ok(outcome);
            }
        }
        if self.settings.fetch_mode == FetchMode::Cached {
            return self.load_offline(None);
        }

        match self.api.list_items() {
            Ok(items) => {
                let count = items.len();
                if let Some((cache, key)) = self.cache.as_mut() {
                    if let Err(e) = cache.store(key, &items) {
                        tracing::warn!(target: "controller", "Could not cache list: {}", e);
                    }
                }
                self.load_all(items);
                tracing::info!(target: "controller", "Loaded {} items from server", count);
                Ok(RefreshOutcome {
                    source: DataSource::Server,
                    count,
                    warning: None,
                })
            }
            Err(e) => {
                tracing::warn!(target: "controller", "Fetch failed: {}", e);
                self.load_offline(Some(e))
            }
        }
    }

    fn load_fresh_cache(&mut self) -> Option<RefreshOutcome> {
        let (cache, key) = self.cache.as_ref()?;
        let cached = match cache.get_fresh(key, self.settings.cache_ttl) {
            Ok(hit) => hit?,
            Err(e) => {
                tracing::warn!(target: "controller", "Cache read failed: {}", e);
                return None;
            }
        };
        let count = cached.items.len();
        let fetched_at = cached.fetched_at;
        self.load_all(cached.items);
        tracing::debug!(target: "controller", "Serving {} items from fresh cache", count);
        Some(RefreshOutcome {
            source: DataSource::FreshCache(fetched_at),
            count,
            warning: None,
        })
    }

    /// Stale cache, then the built-in catalog. `cause` is returned when
    /// neither is available.
    fn load_offline(&mut self, cause: Option<CatalogError>) -> Result<RefreshOutcome> {
        let stale = self
            .cache
            .as_ref()
            .and_then(|(cache, key)| cache.get_any(key).ok().flatten());
        if let Some(cached) = stale {
            let count = cached.items.len();
            let fetched_at = cached.fetched_at;
            self.load_all(cached.items);
            return Ok(RefreshOutcome {
                source: DataSource::StaleCache(fetched_at),
                count,
                warning: Some(format!(
                    "Showing cached data from {}",
                    fetched_at.format("%d.%m.%Y %H:%M")
                )),
            });
        }

        if self.settings.use_fallback {
            let items = MockCatalog::builtin().list_items()?;
            let count = items.len();
            self.load_all(items);
            let reason = match &cause {
                Some(e) if e.is_network() => "Server unavailable".to_string(),
                Some(e) => format!("Server failed ({})", e),
                None => "No cached list".to_string(),
            };
            return Ok(RefreshOutcome {
                source: DataSource::Fallback,
                count,
                warning: Some(format!("{}, showing the built-in sample catalog", reason)),
            });
        }

        Err(cause.unwrap_or_else(|| {
            CatalogError::NetworkUnavailable("no cached list available".to_string())
        }))
    }

    // ---- Create / save / delete ----

    fn validate(item: &Item) -> Result<()> {
        let mut errors = Vec::new();
        if item.name.trim().is_empty() {
            errors.push("name is required".to_string());
        }
        if item.category.trim().is_empty() {
            errors.push("category is required".to_string());
        }
        errors.extend(seo::validate(&SeoFields::from_item(item)));

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(errors))
        }
    }

    /// POST a new item. A name clash leaves both views untouched.
    pub fn create(&mut self, item: Item) -> Result<Item> {
        Self::validate(&item)?;
        let saved = self.api.create_item(&item)?;
        for view in self.views_mut() {
            view.upsert_item(saved.clone());
        }
        tracing::info!(target: "controller", "Created '{}'", saved.name);
        Ok(saved)
    }

    /// PUT an edited item. `original_name` is its name before the edit.
    pub fn save(&mut self, original_name: &str, item: Item) -> Result<Item> {
        Self::validate(&item)?;
        if self.admin.get(original_name).is_none() {
            return Err(CatalogError::NotFound(original_name.to_string()));
        }
        let saved = self.api.update_item(original_name, &item)?;
        for view in self.views_mut() {
            view.replace_item(original_name, saved.clone());
        }
        if saved.name != original_name && self.selection.remove(original_name) {
            self.selection.insert(saved.name.clone());
        }
        if saved.name != original_name && self.preferences.is_favorite(original_name) {
            self.preferences.rename_favorite(original_name, &saved.name);
            self.persist_preferences()?;
        }
        tracing::info!(target: "controller", "Saved '{}'", saved.name);
        Ok(saved)
    }

    /// Remove at once, put back where it was if the server refuses
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let (admin_idx, admin_item) = self
            .admin
            .remove_item(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        let public_removed = self.public.remove_item(name);

        match self.api.delete_item(name) {
            Ok(()) => {
                self.selection.remove(name);
                tracing::info!(target: "controller", "Deleted '{}'", name);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(target: "controller", "Delete of '{}' failed, restoring: {}", name, e);
                self.admin.restore_item(admin_idx, admin_item);
                if let Some((idx, item)) = public_removed {
                    self.public.restore_item(idx, item);
                }
                Err(e)
            }
        }
    }

    // ---- Quick edits ----

    fn quick_edit<F>(&mut self, name: &str, edit: F) -> Result<Item>
    where
        F: Fn(&mut Item),
    {
        let before = self
            .admin
            .update_item(name, &edit)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        self.public.update_item(name, &edit);

        let mut updated = before.clone();
        edit(&mut updated);

        match self.api.update_item(name, &updated) {
            Ok(saved) => {
                for view in self.views_mut() {
                    view.replace_item(name, saved.clone());
                }
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!(target: "controller", "Update of '{}' failed, reverting: {}", name, e);
                for view in self.views_mut() {
                    view.replace_item(name, before.clone());
                }
                Err(e)
            }
        }
    }

    pub fn set_badge(&mut self, name: &str, badge: BadgeType) -> Result<Item> {
        self.quick_edit(name, |item| item.badge_type = badge)
    }

    /// An empty version clears it
    pub fn set_version(&mut self, name: &str, version: &str) -> Result<Item> {
        let version = version.trim();
        let value = (!version.is_empty()).then(|| version.to_string());
        self.quick_edit(name, |item| item.version = value.clone())
    }

    /// An empty link clears it; anything else must be an absolute URL
    pub fn set_download_url(&mut self, name: &str, url: &str) -> Result<Item> {
        let url = url.trim();
        let value = if url.is_empty() {
            None
        } else {
            Some(parse_http_url(url)?.to_string())
        };
        self.quick_edit(name, |item| item.download_url = value.clone())
    }

    /// Flip the featured flag. Returns the flag the server settled on.
    pub fn toggle_featured(&mut self, name: &str) -> Result<bool> {
        let wanted = !self
            .admin
            .get(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?
            .featured;
        for view in self.views_mut() {
            view.update_item(name, |item| item.featured = wanted);
        }

        match self.api.set_featured(name, wanted) {
            Ok(actual) => {
                if actual != wanted {
                    for view in self.views_mut() {
                        view.update_item(name, |item| item.featured = actual);
                    }
                }
                Ok(actual)
            }
            Err(e) => {
                tracing::warn!(target: "controller", "Featured toggle of '{}' failed: {}", name, e);
                for view in self.views_mut() {
                    view.update_item(name, |item| item.featured = !wanted);
                }
                Err(e)
            }
        }
    }

    // ---- Scrape and categories ----

    /// Ask the server to read a store page. The result is a draft with
    /// generated SEO fields; nothing is saved.
    pub fn scrape(&mut self, url: &str) -> Result<Item> {
        let parsed = parse_http_url(url.trim())?;
        let mut draft = self.api.scrape(parsed.as_str())?;
        if draft.website.is_none() {
            draft.website = Some(parsed.to_string());
        }
        seo::auto_fill(&mut draft);
        tracing::info!(target: "controller", "Scraped draft '{}' from {}", draft.name, parsed);
        Ok(draft)
    }

    /// Category picker options. Without the server the categories already in
    /// use are offered.
    pub fn category_suggestions(&self) -> Vec<String> {
        match self.api.categories() {
            Ok(tree) => tree.suggestions(),
            Err(e) => {
                tracing::warn!(target: "controller", "Categories unavailable: {}", e);
                self.admin.categories()
            }
        }
    }

    /// Known categories close to what was typed, for the edit form
    pub fn category_hints(&self, text: &str) -> Vec<String> {
        SearchFilter::suggest_categories(&self.admin.categories(), text, self.settings.max_similar)
    }

    /// Items named like `name`, for "did you mean" hints
    pub fn similar(&self, name: &str) -> Vec<&Item> {
        SearchFilter::similar_items(self.admin.all_items(), name, self.settings.max_similar)
            .into_iter()
            .map(|(_, item)| item)
            .collect()
    }

    // ---- Search and filters on the active view ----

    /// Typed search text; applied by `poll_search` after the quiet period
    pub fn search_input(&mut self, text: &str) {
        self.search.input(text);
    }

    pub fn search_input_at(&mut self, text: &str, now: Instant) {
        self.search.input_at(text, now);
    }

    pub fn poll_search(&mut self) -> bool {
        self.poll_search_at(Instant::now())
    }

    pub fn poll_search_at(&mut self, now: Instant) -> bool {
        match self.search.poll_at(now) {
            Some(term) => self.apply_search(&term),
            None => false,
        }
    }

    /// Apply `text` at once, dropping any pending input
    pub fn submit_search(&mut self, text: &str) -> bool {
        let term = self.search.submit(text);
        self.apply_search(&term)
    }

    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn search_time_remaining(&self) -> Option<Duration> {
        self.search.time_remaining()
    }

    pub fn search_time_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.search.time_remaining_at(now)
    }

    fn apply_search(&mut self, term: &str) -> bool {
        let view = self.view_mut();
        let category = view.predicate().category.clone();
        let badge = view.predicate().badge;
        view.apply_filter(Some(term), category.as_deref(), badge)
    }

    pub fn filter_category(&mut self, category: Option<&str>) -> bool {
        let view = self.view_mut();
        let search = view.predicate().search_term.clone();
        let badge = view.predicate().badge;
        view.apply_filter(Some(&search), category, badge)
    }

    pub fn filter_badge(&mut self, badge: Option<BadgeType>) -> bool {
        let view = self.view_mut();
        let search = view.predicate().search_term.clone();
        let category = view.predicate().category.clone();
        view.apply_filter(Some(&search), category.as_deref(), badge)
    }

    pub fn clear_filters(&mut self) -> bool {
        self.search.cancel();
        if self.active == ViewKind::Public {
            self.favorites_only = false;
        }
        self.view_mut().clear_filters()
    }

    // ---- Selection and bulk edits ----

    /// Selected item names, sorted
    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    /// Returns whether `name` is now selected
    pub fn toggle_selection(&mut self, name: &str) -> Result<bool> {
        if self.admin.get(name).is_none() {
            return Err(CatalogError::NotFound(name.to_string()));
        }
        if self.selection.remove(name) {
            Ok(false)
        } else {
            self.selection.insert(name.to_string());
            Ok(true)
        }
    }

    /// Select everything the active view's filters let through. Returns how
    /// many names were added.
    pub fn select_visible(&mut self) -> usize {
        let names: Vec<String> = self
            .view()
            .filtered_items()
            .into_iter()
            .map(|item| item.name.clone())
            .collect();
        let before = self.selection.len();
        self.selection.extend(names);
        self.selection.len() - before
    }

    pub fn clear_selection(&mut self) -> usize {
        let count = self.selection.len();
        self.selection.clear();
        count
    }

    /// Selected items in admin list order
    pub fn selected_items(&self) -> Vec<&Item> {
        self.admin
            .all_items()
            .iter()
            .filter(|item| self.selection.contains(&item.name))
            .collect()
    }

    fn for_each_selected<F>(&mut self, action: &str, mut op: F) -> Result<BulkOutcome>
    where
        F: FnMut(&mut Self, &str) -> Result<()>,
    {
        if self.selection.is_empty() {
            return Err(CatalogError::Validation(vec!["no items selected".to_string()]));
        }
        let names: Vec<String> = self.selection.iter().cloned().collect();
        let mut outcome = BulkOutcome::default();
        for name in names {
            match op(self, &name) {
                Ok(()) => outcome.succeeded.push(name),
                Err(e) => outcome.failed.push((name, e)),
            }
        }
        tracing::info!(
            target: "controller",
            "Bulk {}: {} done, {} failed",
            action,
            outcome.succeeded.len(),
            outcome.failed.len()
        );
        Ok(outcome)
    }

    /// Each delete is optimistic on its own; failures are restored
    pub fn bulk_delete(&mut self) -> Result<BulkOutcome> {
        self.for_each_selected("delete", |this, name| this.delete(name))
    }

    pub fn bulk_set_category(&mut self, category: &str) -> Result<BulkOutcome> {
        let category = category.trim().to_string();
        if category.is_empty() {
            return Err(CatalogError::Validation(vec!["category is required".to_string()]));
        }
        self.for_each_selected("category", |this, name| {
            this.quick_edit(name, |item| item.category = category.clone())
                .map(|_| ())
        })
    }

    pub fn bulk_set_badge(&mut self, badge: BadgeType) -> Result<BulkOutcome> {
        self.for_each_selected("badge", |this, name| this.set_badge(name, badge).map(|_| ()))
    }

    /// Flips each selected item's own flag
    pub fn bulk_toggle_featured(&mut self) -> Result<BulkOutcome> {
        self.for_each_selected("featured", |this, name| {
            this.toggle_featured(name).map(|_| ())
        })
    }

    // ---- Public view preferences ----

    /// Add or remove a favorite. Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, name: &str) -> Result<bool> {
        let now_favorite = self.preferences.toggle_favorite(name);
        self.persist_preferences()?;
        if self.favorites_only {
            self.public
                .restrict_to_names(Some(self.preferences.favorite_set()));
        }
        Ok(now_favorite)
    }

    /// Show only favorites in the public view, or everything again
    pub fn set_favorites_only(&mut self, on: bool) -> bool {
        self.favorites_only = on;
        let names = on.then(|| self.preferences.favorite_set());
        self.public.restrict_to_names(names)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.preferences.theme = self.preferences.theme.toggled();
        self.persist_preferences()?;
        Ok(self.preferences.theme)
    }

    fn persist_preferences(&self) -> Result<()> {
        match &self.preferences_path {
            Some(path) => self.preferences.save_to(path),
            None => Ok(()),
        }
    }
}

/// Absolute http(s) URL
pub fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CatalogError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            raw, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_url() {
        assert!(parse_http_url("https://apps.apple.com/app/id1").is_ok());
        assert!(matches!(
            parse_http_url("ftp://example.com"),
            Err(CatalogError::InvalidUrl(_))
        ));
        assert!(parse_http_url("not a url").is_err());
    }

    #[test]
    fn test_offline_controller_uses_fallback() {
        let mut controller =
            CatalogController::new(MockCatalog::builtin(), ControllerSettings::default());
        let outcome = controller.refresh().unwrap();
        assert_eq!(outcome.source, DataSource::Server);
        assert_eq!(controller.admin().all_items().len(), 4);
        assert_eq!(controller.public().all_items().len(), 4);

        // The fallback catalog is read-only, so the optimistic flip is undone
        let before = controller.admin().get("Sketch").unwrap().featured;
        assert!(controller.toggle_featured("Sketch").is_err());
        assert_eq!(controller.admin().get("Sketch").unwrap().featured, before);
    }
}
