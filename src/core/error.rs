/// sqldesk Error Module
///
/// Error types for everything around the query executor: startup, seeding,
/// configuration and the request boundary. The executor itself never returns
/// these; it folds driver failures into a `ResultEnvelope`.
use thiserror::Error;

/// Error type for the sqldesk application.
#[derive(Error, Debug)]
pub enum SqldeskError {
    /// Database-related errors from SQLite operations
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding and decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Result to use SqldeskError as the error type.
pub type Result<T> = std::result::Result<T, SqldeskError>;
