use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::Result;
use crate::utils::app_paths::AppPaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    #[serde(rename = "light-mode")]
    Light,
    #[serde(rename = "dark-mode")]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light-mode"),
            Theme::Dark => f.write_str("dark-mode"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" | "light-mode" => Ok(Theme::Light),
            "dark" | "dark-mode" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Visitor preferences of the public view, persisted between sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: Theme,
    /// Favorite item names in the order they were added
    pub app_favorites: Vec<String>,
}

impl Preferences {
    pub fn default_path() -> Result<PathBuf> {
        Ok(AppPaths::preferences_file()?)
    }

    /// Missing files give the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Remove `name` if present, otherwise append it. Returns the new state.
    pub fn toggle_favorite(&mut self, name: &str) -> bool {
        if let Some(pos) = self.app_favorites.iter().position(|n| n == name) {
            self.app_favorites.remove(pos);
            false
        } else {
            self.app_favorites.push(name.to_string());
            true
        }
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.app_favorites.iter().any(|n| n == name)
    }

    pub fn favorite_set(&self) -> BTreeSet<String> {
        self.app_favorites.iter().cloned().collect()
    }

    /// Follow a rename so the favorite survives it
    pub fn rename_favorite(&mut self, old: &str, new: &str) {
        if let Some(slot) = self.app_favorites.iter_mut().find(|n| n.as_str() == old) {
            *slot = new.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_toggle_favorite() {
        let mut prefs = Preferences::default();
        assert!(prefs.toggle_favorite("Sketch"));
        assert!(prefs.toggle_favorite("Logic Pro"));
        assert!(prefs.is_favorite("Sketch"));
        assert!(!prefs.toggle_favorite("Sketch"));
        assert_eq!(prefs.app_favorites, vec!["Logic Pro"]);
    }

    #[test]
    fn test_persistence_uses_storage_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");

        let mut prefs = Preferences::load_from(&path).unwrap();
        assert_eq!(prefs, Preferences::default());

        prefs.theme = Theme::Dark;
        prefs.toggle_favorite("Sketch");
        prefs.save_to(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark-mode");
        assert_eq!(raw["appFavorites"], serde_json::json!(["Sketch"]));

        let loaded = Preferences::load_from(&path).unwrap();
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_rename_favorite() {
        let mut prefs = Preferences::default();
        prefs.toggle_favorite("Old");
        prefs.rename_favorite("Old", "New");
        assert!(prefs.is_favorite("New"));
        assert!(!prefs.is_favorite("Old"));
    }
}
