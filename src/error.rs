use thiserror::Error;

/// All possible errors in the site layer
#[derive(Error, Debug)]
pub enum SiteError {
    /// Malformed SQL, bad identifiers, constraint violations, open failures.
    #[error("Query error: {0}")]
    Query(#[from] rusqlite::Error),

    /// Template file missing or unreadable.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{failed} of {total} checks failed")]
    ChecksFailed { failed: usize, total: usize },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SiteError>;
