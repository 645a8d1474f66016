//! API handlers for the catalog service.

pub mod auth;
pub mod products;
pub mod variants;

pub use auth::*;
pub use products::*;
pub use variants::*;

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::TokenCodec;
use crate::upload::ImageHost;
use crate::web::error::ApiError;
use crate::Database;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Session token codec.
    pub tokens: Arc<TokenCodec>,
    /// Image storage backend.
    pub images: Arc<dyn ImageHost>,
    /// Maximum accepted image size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: Database,
        tokens: TokenCodec,
        images: Arc<dyn ImageHost>,
        max_upload_size: u64,
    ) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
            images,
            max_upload_size,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("tokens", &self.tokens)
            .field("max_upload_size", &self.max_upload_size)
            .finish_non_exhaustive()
    }
}

/// Parse a UUID path segment.
pub(crate) fn parse_path_uuid(raw: &str, kind: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid {kind} UUID format")))
}
