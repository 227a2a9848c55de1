use thiserror::Error;

pub type Result<T> = std::result::Result<T, MindlogError>;

#[derive(Error, Debug)]
pub enum MindlogError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Not found: {0}")]
    NotFound(String),
}
