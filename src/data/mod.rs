//! Catalog data model and the list engine that pages, filters and sorts it.

pub mod exporter;
pub mod item;
pub mod list_state;
