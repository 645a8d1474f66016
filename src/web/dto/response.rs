//! Response DTOs for the catalog API.

use serde::Serialize;
use uuid::Uuid;

use crate::catalog::{Page, Product, Variant};
use crate::db::Admin;

/// Public view of an administrator (never includes the password hash).
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    /// Administrator UUID.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Registration timestamp.
    pub created_at: String,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            uuid: admin.uuid,
            name: admin.name,
            email: admin.email,
            created_at: admin.created_at,
        }
    }
}

/// `{"admin": ...}`
#[derive(Debug, Serialize)]
pub struct AdminBody {
    /// The administrator.
    pub admin: AdminResponse,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token (JWT).
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Total number of matching items.
    pub total: i64,
}

impl PaginationMeta {
    /// Metadata for `page` out of `total` items.
    pub fn new(page: Page, total: i64) -> Self {
        Self {
            page: page.page,
            page_size: page.page_size,
            total,
        }
    }
}

/// `{"product": ...}`
#[derive(Debug, Serialize)]
pub struct ProductBody {
    /// The product.
    pub product: Product,
}

/// A product with its variants.
#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    /// The product.
    pub product: Product,
    /// Its variants.
    pub variants: Vec<Variant>,
}

/// Paginated product listing.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    /// Products on this page.
    pub products: Vec<Product>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// `{"variant": ...}`
#[derive(Debug, Serialize)]
pub struct VariantBody {
    /// The variant.
    pub variant: Variant,
}

/// Paginated variant listing.
#[derive(Debug, Serialize)]
pub struct VariantListResponse {
    /// Variants on this page.
    pub variants: Vec<Variant>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
