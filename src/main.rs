use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use crossterm::style::Stylize;
use reedline::{
    default_emacs_keybindings, ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers,
    MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline,
    ReedlineEvent, ReedlineMenu, Signal,
};
use std::borrow::Cow;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

mod completer;

use catalog_console::analytics::{self, AnalyticsReport};
use catalog_console::api_client::{ApiClient, CatalogApi};
use catalog_console::cache::ListCache;
use catalog_console::command::{
    BulkAction, CacheAction, Command, ModerateAction, ReportKind, SelectTarget,
};
use catalog_console::config::config::{Config, ViewKind};
use catalog_console::controller::{BulkOutcome, CatalogController, ControllerSettings, DataSource};
use catalog_console::data::exporter::DataExporter;
use catalog_console::data::item::{BadgeType, Item};
use catalog_console::error::CatalogError;
use catalog_console::mock_catalog::MockCatalog;
use catalog_console::moderation::{self, Check};
use catalog_console::preferences::Preferences;
use catalog_console::seo::{self, CounterLevel, SeoField, SeoFields};
use catalog_console::ui::{admin_table, public_grid, reports, RenderOptions};
use catalog_console::utils::app_paths::AppPaths;
use catalog_console::utils::logging::{self, LogRingBuffer};
use completer::{CatalogCompleter, SharedNames};

/// Lowest-scoring apps listed by `report quality`
const QUALITY_ROWS: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "catalog-console", version)]
#[command(about = "Terminal console for the Mac app catalog", long_about = None)]
struct Cli {
    /// Catalog server root (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// View to start in (admin/public)
    #[arg(long)]
    view: Option<ViewKind>,

    /// Do not contact the server; use the built-in sample catalog
    #[arg(long)]
    offline: bool,

    /// Initialize configuration with wizard
    #[arg(long)]
    init_config: bool,

    /// Generate config file with defaults
    #[arg(long)]
    generate_config: bool,

    /// Read this config file instead of the default one
    #[arg(long)]
    config: Option<PathBuf>,

    /// More detailed logs (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

struct CatalogPrompt {
    label: String,
}

impl Prompt for CatalogPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.label)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => "> ".into(),
            PromptEditMode::Vi(vi_mode) => match vi_mode {
                reedline::PromptViMode::Normal => "N> ".into(),
                reedline::PromptViMode::Insert => "I> ".into(),
            },
            PromptEditMode::Custom(str) => format!("{str}> ").into(),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse search: {})",
            prefix, history_search.term
        ))
    }
}

fn print_help() {
    println!("{}", "Catalog Console".blue().bold());
    println!();
    println!("{}", "Navigation:".yellow());
    println!("  {}             - Show the current page", "list".green());
    println!("  {}           - Jump to page N", "page N".green());
    println!("  {}      - Next / previous page", "next, prev".green());
    println!("  {}         - Switch view", "view admin|public".green());
    println!();
    println!("{}", "Search and filters:".yellow());
    println!("  {}      - Search now", "search TEXT".green());
    println!("  {}        - Search after a short pause (like typing)", "type TEXT".green());
    println!("  {} - Filter by category (empty clears)", "filter category NAME".green());
    println!("  {}  - Filter by badge (empty clears)", "filter badge none|new|updated".green());
    println!("  {}            - Remove all filters", "clear".green());
    println!("  {}  - Sort; repeating a key flips the order", "sort KEY [asc|desc]".green());
    println!("                     keys: name category badge featured created recent");
    println!("                     public: default name-asc name-desc");
    println!();
    println!("{}", "Items:".yellow());
    println!("  {}        - Show every field", "show NAME".green());
    println!("  {}              - Create an item", "add".green());
    println!("  {}        - Edit an item", "edit NAME".green());
    println!("  {}      - Delete an item", "delete NAME".green());
    println!("  {}  - Set the badge", "badge NAME BADGE".green());
    println!("  {} - Set the version", "version NAME VER".green());
    println!("  {}   - Set the download link", "link NAME URL".green());
    println!("  {}     - Toggle featured", "feature NAME".green());
    println!("  {}       - Draft an item from a store page", "scrape URL".green());
    println!("  {}         - SEO report", "seo NAME".green());
    println!("  {}       - Category suggestions", "categories".green());
    println!();
    println!("{}", "Selection and bulk edits:".yellow());
    println!("  {}      - Toggle one item (all = filtered list, none = clear)", "select NAME".green());
    println!("  {}      - Delete the selected items", "bulk delete".green());
    println!("  {} - Move them to a category", "bulk category NAME".green());
    println!("  {}    - Toggle featured on each", "bulk featured".green());
    println!("  {}   - Set the badge of each", "bulk badge BADGE".green());
    println!("  {} - Export the selection", "bulk export [FILE]".green());
    println!();
    println!("{}", "Moderation and analytics:".yellow());
    println!("  {} - Content, spam and data checks", "moderate [scan|spam|validate]".green());
    println!("  {} - Catalog analytics", "report [overview|insights|categories|quality]".green());
    println!("  {} - Write all analytics as JSON", "report export [FILE]".green());
    println!();
    println!("{}", "Public view:".yellow());
    println!("  {}         - Toggle a favorite", "fav NAME".green());
    println!("  {} - Show only favorites", "favorites [on|off]".green());
    println!("  {}            - Toggle light/dark", "theme".green());
    println!();
    println!("{}", "Other:".yellow());
    println!("  {}    - Export the filtered list (.csv or .json)", "export [FILE]".green());
    println!("  {}          - Reload from the server", "refresh".green());
    println!("  {} - Cache entries; clear all or drop one", "cache [clear|drop ID]".green());
    println!("  {}        - Recent log lines", "log [N]".green());
    println!("  {}        - Exit", "quit, Ctrl+D".green());
    println!();
}

/// Read one line from stdin, returning `current` when left empty
fn ask(label: &str, current: &str) -> Result<String> {
    if current.is_empty() {
        print!("{}: ", label);
    } else {
        print!("{} [{}]: ", label, current);
    }
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let input = input.trim();
    Ok(if input.is_empty() {
        current.to_string()
    } else {
        input.to_string()
    })
}

fn confirm(question: &str) -> Result<bool> {
    let answer = ask(&format!("{} (y/n)", question), "y")?;
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn report_error(error: &CatalogError) {
    match error {
        CatalogError::Validation(errors) => {
            eprintln!("{}", "Please fix the following:".red());
            for e in errors {
                eprintln!("  - {}", e);
            }
        }
        other => eprintln!("{}", format!("Error: {}", other).red()),
    }
}

fn report_bulk(action: &str, outcome: &BulkOutcome) {
    if !outcome.succeeded.is_empty() {
        println!(
            "{}",
            format!("{} {} items", action, outcome.succeeded.len()).green()
        );
    }
    for (name, error) in &outcome.failed {
        eprintln!("{}", format!("  {}: {}", name, error).red());
    }
}

enum Flow {
    Continue,
    Quit,
}

struct Session {
    controller: CatalogController,
    config: Config,
    options: RenderOptions,
    names: SharedNames,
    log_buffer: LogRingBuffer,
}

impl Session {
    fn render_options(&self) -> RenderOptions {
        let page_window = match self.controller.active_view() {
            ViewKind::Admin => self.config.pagination.admin_page_window,
            ViewKind::Public => self.config.pagination.public_page_window,
        };
        RenderOptions {
            page_window,
            theme: self.controller.preferences().theme,
            ..self.options
        }
    }

    fn render(&self) {
        let options = self.render_options();
        let text = match self.controller.active_view() {
            ViewKind::Admin => admin_table::render(self.controller.admin(), &options),
            ViewKind::Public => public_grid::render(
                self.controller.public(),
                self.controller.preferences(),
                &options,
            ),
        };
        println!("{}", text);
    }

    fn prompt(&self) -> CatalogPrompt {
        let view = self.controller.view();
        let mut label = format!(
            "{} {}/{}",
            self.controller.active_view(),
            view.current_page(),
            view.total_pages()
        );
        if self.controller.search_pending() {
            label.push('*');
        }
        CatalogPrompt { label }
    }

    fn sync_names(&self) {
        let names = self
            .controller
            .admin()
            .all_items()
            .iter()
            .map(|item| item.name.clone())
            .collect();
        *self.names.lock().unwrap_or_else(PoisonError::into_inner) = names;
    }

    fn refresh(&mut self) {
        match self.controller.refresh() {
            Ok(outcome) => {
                if let Some(warning) = &outcome.warning {
                    println!("{}", warning.as_str().yellow());
                }
                let source = match outcome.source {
                    DataSource::Server => "server".to_string(),
                    DataSource::FreshCache(at) => format!("cache ({})", at.format("%H:%M")),
                    DataSource::StaleCache(_) => "stale cache".to_string(),
                    DataSource::Fallback => "built-in catalog".to_string(),
                };
                println!(
                    "{}",
                    format!("Loaded {} items from {}", outcome.count, source).cyan()
                );
            }
            Err(e) => report_error(&e),
        }
        self.sync_names();
    }

    /// Run `f`, print its error, and re-render on success
    fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut CatalogController) -> Result<T, CatalogError>,
        describe: impl FnOnce(&T) -> String,
    ) {
        match f(&mut self.controller) {
            Ok(value) => {
                println!("{}", describe(&value).green());
                self.sync_names();
                self.render();
            }
            Err(e) => {
                report_error(&e);
                if let CatalogError::NotFound(name) = &e {
                    self.suggest(name);
                }
            }
        }
    }

    fn suggest(&self, name: &str) {
        let similar = self.controller.similar(name);
        if !similar.is_empty() {
            let names: Vec<&str> = similar.iter().map(|item| item.name.as_str()).collect();
            println!("Did you mean: {}", names.join(", "));
        }
    }

    fn find(&self, name: &str) -> Option<Item> {
        let item = self.controller.admin().get(name).cloned();
        if item.is_none() {
            eprintln!("{}", format!("No item named '{}'", name).red());
            self.suggest(name);
        }
        item
    }

    /// Prompt for the editable fields of `item`
    fn fill_form(&self, item: &mut Item) -> Result<()> {
        item.name = ask("Name", &item.name)?;
        if item.category.is_empty() {
            let suggestions = self.controller.category_suggestions();
            if !suggestions.is_empty() {
                println!("Categories: {}", suggestions.join(", "));
            }
        }
        item.category = ask("Category", &item.category)?;
        let hints = self.controller.category_hints(&item.category);
        if !hints.is_empty() && !hints.contains(&item.category) {
            println!("Known categories like it: {}", hints.join(", "));
            item.category = ask("Category", &item.category)?;
        }

        let badge = ask("Badge (none/new/updated)", item.badge_type.as_str())?;
        item.badge_type = badge.parse().unwrap_or(BadgeType::None);

        let optional = |value: String| (!value.is_empty()).then_some(value);
        item.version = optional(ask("Version", item.version.as_deref().unwrap_or(""))?);
        item.file_size = optional(ask("File size", item.file_size.as_deref().unwrap_or(""))?);
        item.download_url = optional(ask(
            "Download URL",
            item.download_url.as_deref().unwrap_or(""),
        )?);
        item.description = optional(ask(
            "Description",
            item.description.as_deref().unwrap_or(""),
        )?);

        if confirm("Generate SEO fields")? {
            seo::auto_fill(item);
        }
        Ok(())
    }

    fn seo_report(&self, item: &Item) {
        let fields = SeoFields::from_item(item);
        let report = seo::analyze(&fields);
        let options = self.render_options();

        println!("{}", format!("SEO report for {}", item.name).bold());
        println!("Overall: {}/100", report.overall);
        for (label, score) in [
            ("Title", &report.title),
            ("Description", &report.description),
            ("Keywords", &report.keywords),
            ("Slug", &report.slug),
        ] {
            println!("  {:<12} {:>3}/100  {}", label, score.score, score.feedback);
        }

        for field in SeoField::ALL {
            let value = fields.get(field);
            let count = format!("{}/{}", value.chars().count(), field.max_len());
            let color = match seo::counter_level(value, field) {
                CounterLevel::Ok => crossterm::style::Color::Green,
                CounterLevel::Warning => crossterm::style::Color::Yellow,
                CounterLevel::Danger => crossterm::style::Color::Red,
            };
            println!("  {:<12} {}", field.label(), options.paint(&count, color));
        }
        for problem in seo::validate(&fields) {
            println!("  {}", problem.red());
        }
    }

    fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::List => self.render(),
            Command::Page(n) => {
                if self.controller.view_mut().goto_page(n) {
                    self.render();
                }
            }
            Command::Next => {
                if self.controller.view_mut().next_page() {
                    self.render();
                }
            }
            Command::Prev => {
                if self.controller.view_mut().prev_page() {
                    self.render();
                }
            }
            Command::Search(text) => {
                if self.controller.submit_search(&text) {
                    self.render();
                }
            }
            Command::Type(text) => {
                self.controller.search_input(&text);
                if let Some(wait) = self.controller.search_time_remaining() {
                    println!("Search applies in {} ms.", wait.as_millis());
                }
            }
            Command::FilterCategory(category) => {
                if self.controller.filter_category(category.as_deref()) {
                    self.render();
                }
            }
            Command::FilterBadge(badge) => {
                if self.controller.filter_badge(badge) {
                    self.render();
                }
            }
            Command::Clear => {
                if self.controller.clear_filters() {
                    self.render();
                }
            }
            Command::Sort { key, order } => {
                if self.controller.view_mut().sort_by(key, order) {
                    self.render();
                }
            }
            Command::View(view) => {
                self.controller.set_active_view(view);
                self.render();
            }
            Command::Show(name) => {
                if let Some(item) = self.find(&name) {
                    println!("{}", admin_table::render_details(&item, &self.render_options()));
                }
            }
            Command::Add => {
                let mut item = Item::default();
                self.fill_form(&mut item)?;
                self.mutate(|c| c.create(item), |saved| format!("Created '{}'", saved.name));
            }
            Command::Edit(name) => {
                if let Some(mut item) = self.find(&name) {
                    self.fill_form(&mut item)?;
                    self.mutate(|c| c.save(&name, item), |saved| format!("Saved '{}'", saved.name));
                }
            }
            Command::Delete(name) => {
                if self.find(&name).is_some() && confirm(&format!("Delete '{}'?", name))? {
                    self.mutate(|c| c.delete(&name), |_| format!("Deleted '{}'", name));
                }
            }
            Command::Badge { name, badge } => self.mutate(
                |c| c.set_badge(&name, badge),
                |item| format!("Badge of '{}' is now {}", item.name, item.badge_type),
            ),
            Command::Version { name, version } => self.mutate(
                |c| c.set_version(&name, &version),
                |item| format!("Version of '{}' updated", item.name),
            ),
            Command::Link { name, url } => self.mutate(
                |c| c.set_download_url(&name, &url),
                |item| format!("Download link of '{}' updated", item.name),
            ),
            Command::Feature(name) => self.mutate(
                |c| c.toggle_featured(&name),
                |featured| {
                    if *featured {
                        format!("'{}' is featured", name)
                    } else {
                        format!("'{}' is no longer featured", name)
                    }
                },
            ),
            Command::Fav(name) => {
                if self.find(&name).is_some() {
                    self.mutate(
                        |c| c.toggle_favorite(&name),
                        |on| {
                            if *on {
                                format!("Added '{}' to favorites", name)
                            } else {
                                format!("Removed '{}' from favorites", name)
                            }
                        },
                    );
                }
            }
            Command::Favorites(on) => {
                let on = on.unwrap_or(!self.controller.favorites_only());
                self.controller.set_active_view(ViewKind::Public);
                self.controller.set_favorites_only(on);
                self.render();
            }
            Command::Scrape(url) => match self.controller.scrape(&url) {
                Ok(mut draft) => {
                    println!("{}", admin_table::render_details(&draft, &self.render_options()));
                    if confirm("Review and save this item")? {
                        self.fill_form(&mut draft)?;
                        self.mutate(|c| c.create(draft), |saved| format!("Created '{}'", saved.name));
                    }
                }
                Err(e) => report_error(&e),
            },
            Command::Seo(name) => {
                if let Some(item) = self.find(&name) {
                    self.seo_report(&item);
                }
            }
            Command::Categories => {
                for category in self.controller.category_suggestions() {
                    println!("  {}", category);
                }
            }
            Command::Export(path) => {
                let path = path.unwrap_or_else(|| DataExporter::default_filename("csv"));
                let items = self.controller.view().filtered_items();
                match DataExporter::export(&items, &path) {
                    Ok(message) => println!("{}", message.green()),
                    Err(e) => eprintln!("{}", format!("Export error: {}", e).red()),
                }
            }
            Command::Select(target) => self.select(target),
            Command::Bulk(action) => self.bulk(action)?,
            Command::Moderate(action) => {
                let options = self.render_options();
                let items = self.controller.admin().all_items();
                let text = match action {
                    ModerateAction::Report => {
                        reports::render_moderation(&moderation::report(items), &options)
                    }
                    ModerateAction::Only(check) => {
                        let title = match check {
                            Check::Content => "Content",
                            Check::Spam => "Spam",
                            Check::Validation => "Missing data",
                        };
                        reports::render_flagged(title, &moderation::scan(items, check), &options)
                    }
                };
                println!("{}", text);
            }
            Command::Report(kind) => self.report(kind),
            Command::Theme => match self.controller.toggle_theme() {
                Ok(theme) => println!("Theme: {}", theme),
                Err(e) => report_error(&e),
            },
            Command::Refresh => {
                self.refresh();
                self.render();
            }
            Command::Cache(action) => self.cache_command(action),
            Command::Log(count) => {
                for entry in self.log_buffer.get_recent(count) {
                    println!("{}", entry.format_for_display());
                }
                if let Some(path) = logging::log_path() {
                    println!("{}", format!("Full log: {}", path.display()).dark_grey());
                }
            }
            Command::Help => print_help(),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn select(&mut self, target: SelectTarget) {
        match target {
            SelectTarget::Show => {}
            SelectTarget::Name(name) => match self.controller.toggle_selection(&name) {
                Ok(true) => println!("Selected '{}'", name),
                Ok(false) => println!("Unselected '{}'", name),
                Err(e) => {
                    report_error(&e);
                    self.suggest(&name);
                    return;
                }
            },
            SelectTarget::Visible => {
                let added = self.controller.select_visible();
                println!("Added {} items to the selection", added);
            }
            SelectTarget::None => {
                let dropped = self.controller.clear_selection();
                println!("Cleared {} selected items", dropped);
            }
        }
        let selection = self.controller.selection();
        if selection.is_empty() {
            println!("Nothing selected.");
        } else {
            let names: Vec<&str> = selection.iter().map(String::as_str).collect();
            println!("Selected ({}): {}", names.len(), names.join(", "));
        }
    }

    fn bulk(&mut self, action: BulkAction) -> Result<()> {
        let count = self.controller.selection().len();
        let result = match action {
            BulkAction::Export(path) => {
                let path = path.unwrap_or_else(|| DataExporter::default_filename("csv"));
                match DataExporter::export(&self.controller.selected_items(), &path) {
                    Ok(message) => println!("{}", message.green()),
                    Err(e) => eprintln!("{}", format!("Export error: {}", e).red()),
                }
                return Ok(());
            }
            BulkAction::Delete => {
                if count > 0 && !confirm(&format!("Delete {} selected items?", count))? {
                    return Ok(());
                }
                self.controller.bulk_delete().map(|o| ("Deleted", o))
            }
            BulkAction::Category(category) => self
                .controller
                .bulk_set_category(&category)
                .map(|o| ("Recategorized", o)),
            BulkAction::Featured => self
                .controller
                .bulk_toggle_featured()
                .map(|o| ("Toggled featured on", o)),
            BulkAction::Badge(badge) => self
                .controller
                .bulk_set_badge(badge)
                .map(|o| ("Set the badge of", o)),
        };
        match result {
            Ok((label, outcome)) => {
                report_bulk(label, &outcome);
                self.sync_names();
                self.render();
            }
            Err(e) => report_error(&e),
        }
        Ok(())
    }

    fn report(&self, kind: ReportKind) {
        let options = self.render_options();
        let items = self.controller.admin().all_items();
        let text = match kind {
            ReportKind::Overview => reports::render_overview(&analytics::overview(items), &options),
            ReportKind::Insights => reports::render_insights(&analytics::insights(items), &options),
            ReportKind::Categories => {
                reports::render_categories(&analytics::category_analysis(items), &options)
            }
            ReportKind::Quality => reports::render_quality(
                &analytics::quality_report(items),
                QUALITY_ROWS,
                &options,
            ),
            ReportKind::Export(path) => {
                let path = path.unwrap_or_else(|| {
                    PathBuf::from(format!(
                        "analytics_{}.json",
                        chrono::Local::now().format("%Y-%m-%d")
                    ))
                });
                match DataExporter::export_analytics(&AnalyticsReport::build(items), &path) {
                    Ok(message) => message.green().to_string(),
                    Err(e) => format!("Export error: {}", e).red().to_string(),
                }
            }
        };
        println!("{}", text);
    }

    fn cache_command(&mut self, action: CacheAction) {
        let result = match action {
            CacheAction::Clear => self.controller.clear_cache().map(|cleared| {
                if cleared {
                    "Cache cleared".to_string()
                } else {
                    "No cache in use".to_string()
                }
            }),
            CacheAction::Drop(id) => self.controller.drop_cache_entry(id).map(|dropped| {
                if dropped {
                    format!("Dropped cache entry {}", id)
                } else {
                    format!("No cache entry {}", id)
                }
            }),
            CacheAction::Stats => {
                match self.controller.cache_stats() {
                    Some(stats) => println!(
                        "{}",
                        reports::render_cache(
                            &stats,
                            self.controller.cache_entries(),
                            &self.render_options()
                        )
                    ),
                    None => println!("No cache in use"),
                }
                return;
            }
        };
        match result {
            Ok(message) => println!("{}", message.green()),
            Err(e) => report_error(&e),
        }
    }
}

fn build_controller(config: &Config) -> Result<CatalogController> {
    let settings = ControllerSettings::from(config);

    let prefs_path = Preferences::default_path().ok();
    let preferences = match &prefs_path {
        Some(path) => Preferences::load_from(path).unwrap_or_else(|e| {
            tracing::warn!(target: "console", "Ignoring unreadable preferences: {}", e);
            Preferences::default()
        }),
        None => Preferences::default(),
    };

    if config.behavior.offline {
        let api: Box<dyn CatalogApi> = Box::new(MockCatalog::builtin());
        return Ok(CatalogController::new(api, settings).with_preferences(preferences, prefs_path));
    }

    let client = ApiClient::new(&config.api.base_url, config.api.timeout())
        .with_context(|| format!("configuring client for {}", config.api.base_url))?;
    let list_url = client.list_url()?.to_string();
    let api: Box<dyn CatalogApi> = Box::new(client);
    let mut controller =
        CatalogController::new(api, settings).with_preferences(preferences, prefs_path);

    let cache = match &config.behavior.cache_dir {
        Some(dir) => ListCache::open(dir),
        None => ListCache::new(),
    };
    match cache {
        Ok(cache) => controller = controller.with_cache(cache, list_url),
        Err(e) => tracing::warn!(target: "console", "Running without cache: {}", e),
    }
    Ok(controller)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        Config::init_wizard()?;
        println!("\nConfiguration initialized successfully!");
        return Ok(());
    }

    if cli.generate_config {
        let path = Config::get_config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("creating config directory")?;
        }
        std::fs::write(&path, Config::create_default_with_comments())
            .context("writing config file")?;
        println!("Configuration file created at: {:?}", path);
        println!("Edit this file to customize the console.");
        return Ok(());
    }

    let directive = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let log_buffer = logging::init_tracing(directive);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("{}", format!("Using default settings: {:#}", e).yellow());
            Config::default()
        }),
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if cli.offline {
        config.behavior.offline = true;
    }
    let start_view = cli.view.unwrap_or(config.display.default_view);

    let mut controller = build_controller(&config)?;
    controller.set_active_view(start_view);

    let options = RenderOptions {
        use_color: config.display.use_color,
        show_seo_score: config.display.show_seo_score,
        ..RenderOptions::default()
    };
    let names: SharedNames = Arc::new(Mutex::new(Vec::new()));
    let mut session = Session {
        controller,
        config,
        options,
        names: names.clone(),
        log_buffer,
    };

    if session.config.behavior.offline {
        println!("{}", "Offline mode: using the built-in catalog".cyan());
    } else {
        println!(
            "{}",
            format!("Connected to API: {}", session.config.api.base_url).cyan()
        );
    }
    session.refresh();
    session.render();
    println!("Type 'help' for commands.");

    let history_file = AppPaths::history_file()?;
    let history = Box::new(
        FileBackedHistory::with_file(200, history_file).context("configuring history")?,
    );

    let completion_menu = Box::new(
        ColumnarMenu::default()
            .with_name("catalog_completion")
            .with_columns(1)
            .with_column_width(None)
            .with_column_padding(2),
    );

    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::Menu("catalog_completion".to_string()),
    );

    let mut line_editor = Reedline::create()
        .with_completer(Box::new(CatalogCompleter::new(names)))
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_history(history)
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    loop {
        let sig = line_editor.read_line(&session.prompt())?;
        match sig {
            Signal::Success(buffer) => {
                // Typed search that went quiet while the prompt waited
                if session.controller.poll_search() {
                    session.render();
                }

                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let command = match Command::parse(trimmed) {
                    Ok(command) => command,
                    Err(message) => {
                        eprintln!("{}", message.red());
                        continue;
                    }
                };
                tracing::debug!(target: "console", "Command: {:?}", command);

                match session.execute(command) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => eprintln!("{}", format!("Error: {:#}", e).red()),
                }
            }
            Signal::CtrlD | Signal::CtrlC => break,
        }
    }

    println!("\nGoodbye!");
    Ok(())
}
