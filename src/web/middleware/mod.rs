//! Middleware for the catalog API.

pub mod auth;
pub mod cors;
pub mod ownership;

pub use auth::{authenticate, AuthAdmin};
pub use cors::create_cors_layer;
pub use ownership::{require_owner, Owned, OwnershipResolver, ProductOwnership, VariantOwnership};
