//! Filesystem locations and logging setup shared by the library and binary.

pub mod app_paths;
pub mod logging;
