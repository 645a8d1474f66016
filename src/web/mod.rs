//! HTTP API for the catalog service.
//!
//! Every route except registration, login and the health check sits behind
//! the authentication gate; mutations of existing products and variants are
//! additionally wrapped in the ownership guard.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
