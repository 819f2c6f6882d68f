use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::cache::FetchMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub pagination: PaginationConfig,
    pub behavior: BehaviorConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the catalog server, without the `/api` part
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// "live", "cached" or "hybrid"
    pub fetch_mode: FetchMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub admin_per_page: usize,
    pub public_per_page: usize,

    /// Page numbers shown around the current page
    pub admin_page_window: usize,
    pub public_page_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Quiet period before typed search text is applied
    pub search_debounce_ms: u64,

    /// How long a cached list counts as fresh
    pub cache_ttl_secs: u64,

    /// Use the built-in catalog when neither server nor cache is available
    pub use_fallback: bool,

    /// Start without contacting the server
    pub offline: bool,

    /// Suggestions offered by `show` for similar names
    pub max_similar: usize,

    /// Cache directory (leave unset for the platform default)
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub use_color: bool,
    pub default_view: ViewKind,
    /// Show the SEO score column in the admin table
    pub show_seo_score: bool,
}

/// Which of the two list views a command applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Admin,
    Public,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Admin => f.write_str("admin"),
            ViewKind::Public => f.write_str("public"),
        }
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(ViewKind::Admin),
            "public" => Ok(ViewKind::Public),
            other => Err(format!("unknown view '{}', expected admin or public", other)),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 15,
            fetch_mode: FetchMode::Live,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            admin_per_page: 10,
            public_per_page: 20,
            admin_page_window: 5,
            public_page_window: 3,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: crate::debouncer::SEARCH_DEBOUNCE_MS,
            cache_ttl_secs: 300,
            use_fallback: true,
            offline: false,
            max_similar: 5,
            cache_dir: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            default_view: ViewKind::Admin,
            show_seo_score: false,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.normalize();
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("catalog-console").join("config.toml"))
    }

    // Zero page sizes would make every page empty
    fn normalize(&mut self) {
        let defaults = PaginationConfig::default();
        if self.pagination.admin_per_page == 0 {
            self.pagination.admin_per_page = defaults.admin_per_page;
        }
        if self.pagination.public_per_page == 0 {
            self.pagination.public_per_page = defaults.public_per_page;
        }
        self.pagination.admin_page_window = self.pagination.admin_page_window.max(1);
        self.pagination.public_page_window = self.pagination.public_page_window.max(1);
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Catalog Console Configuration File
# Location: ~/.config/catalog-console/config.toml (Linux)
#           ~/Library/Application Support/catalog-console/config.toml (macOS)

[api]
# Root URL of the catalog server
base_url = "http://localhost:5000"

# Request timeout in seconds
timeout_secs = 15

# Where the list comes from: "live" (server, cache on outage),
# "cached" (never contact the server) or "hybrid" (fresh cache first)
fetch_mode = "live"

[pagination]
# Items per page in the admin table and the public grid
admin_per_page = 10
public_per_page = 20

# How many page numbers to show around the current page
admin_page_window = 5
public_page_window = 3

[behavior]
# Delay before typed search text is applied (milliseconds)
search_debounce_ms = 300

# Cached lists younger than this are used without asking the server
cache_ttl_secs = 300

# Show the built-in catalog when the server and cache are unavailable
use_fallback = true

# Start without contacting the server
offline = false

# Number of similar names suggested by `show`
max_similar = 5

# Cache directory (leave commented to use default)
# cache_dir = "/path/to/cache"

[display]
# Colored output
use_color = true

# View selected at start-up: "admin" or "public"
default_view = "admin"

# Show the SEO score column in the admin table
show_seo_score = false
"#
        .to_string()
    }

    /// Initialize config with a setup wizard
    pub fn init_wizard() -> Result<Self> {
        println!("Catalog Console Configuration Setup");
        println!("===================================");

        let mut config = Config::default();

        let url = prompt(&format!("Catalog server URL [{}]: ", config.api.base_url))?;
        if !url.is_empty() {
            config.api.base_url = url;
        }

        let view = prompt("Start in which view? (admin/public) [admin]: ")?;
        if let Ok(view) = view.parse::<ViewKind>() {
            config.display.default_view = view;
        }

        let color = prompt("Use colored output? (y/n) [y]: ")?;
        config.display.use_color = !color.eq_ignore_ascii_case("n");

        config.save()?;

        println!("\nConfiguration saved to: {:?}", Config::get_config_path()?);
        println!("You can edit this file directly to customize further.");

        Ok(config)
    }
}

fn prompt(question: &str) -> Result<String> {
    print!("{}", question);
    std::io::Write::flush(&mut std::io::stdout())?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
