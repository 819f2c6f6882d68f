pub mod analytics;
pub mod api_client;
pub mod cache;
pub mod command;
pub mod config;
pub mod controller;
pub mod data;
pub mod debouncer;
pub mod error;
pub mod mock_catalog;
pub mod moderation;
pub mod preferences;
pub mod search_filter;
pub mod seo;
pub mod ui;
pub mod utils;
