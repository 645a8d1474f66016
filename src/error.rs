//! Error types for the catalog service.

use thiserror::Error;

use crate::auth::TokenError;

/// Common error type for the catalog service.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input shape or syntax.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing, invalid or expired credential.
    #[error("authentication error: {0}")]
    Authentication(#[from] TokenError),

    /// Valid identity without ownership of the target resource.
    #[error("permission denied: {0}")]
    Authorization(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Uniqueness or referential conflict.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Upload exceeds the configured size limit.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Failure of an external collaborator (image host).
    #[error("dependency error: {0}")]
    Dependency(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        CatalogError::Database(e.to_string())
    }
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
