use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("cannot reach server: {0}")]
    NetworkUnavailable(String),

    #[error("server error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("an item with this name already exists: {0}")]
    Conflict(String),

    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("item not found: {0}")]
    NotFound(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Offline-type failures, where cached or built-in data may stand in
    pub fn is_network(&self) -> bool {
        matches!(self, CatalogError::NetworkUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
