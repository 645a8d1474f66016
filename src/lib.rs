//! Catalog - a multi-tenant product catalog service.
//!
//! Administrators register, sign in for an hour-long session token, and
//! manage products and product variants. Everyone signed in may read the
//! whole catalog; only the owning administrator may change a product or its
//! variants.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod upload;
pub mod web;

pub use auth::{
    extract_bearer, hash_password, verify_password, Identity, PasswordError, TokenCodec,
    TokenError,
};
pub use catalog::{Product, ProductRepository, Variant, VariantRepository};
pub use config::Config;
pub use db::{Admin, AdminRepository, Database, NewAdmin};
pub use error::{CatalogError, Result};
pub use upload::{ImageHost, ImageUpload, LocalImageStore};
pub use web::WebServer;
