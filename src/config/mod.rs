//! Configuration module
//!
//! Loading, saving and defaults for `config.toml`.

pub mod config;
