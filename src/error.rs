use thiserror::Error;

/// Main error type for wikigraph
#[derive(Error, Debug)]
pub enum WikigraphError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport errors (connection, timeout, non-2xx status)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot file lacks the expected envelope structure
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

/// Convenient Result type using WikigraphError
pub type Result<T> = std::result::Result<T, WikigraphError>;
