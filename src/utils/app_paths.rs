use std::fs;
use std::io;
use std::path::PathBuf;

const APP_DIR: &str = "catalog-console";

pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> io::Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Cannot determine data directory"))?
            .join(APP_DIR);

        fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn cache_dir() -> io::Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Cannot determine cache directory"))?
            .join(APP_DIR);

        fs::create_dir_all(&cache_dir)?;
        Ok(cache_dir)
    }

    pub fn log_dir() -> io::Result<PathBuf> {
        let log_dir = Self::data_dir()?.join("logs");
        fs::create_dir_all(&log_dir)?;
        Ok(log_dir)
    }

    pub fn history_file() -> io::Result<PathBuf> {
        Ok(Self::data_dir()?.join("history.txt"))
    }

    pub fn preferences_file() -> io::Result<PathBuf> {
        Ok(Self::data_dir()?.join("preferences.json"))
    }
}
