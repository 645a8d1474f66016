//! Product and variant types.

use serde::Serialize;
use uuid::Uuid;

use crate::db::admin::parse_uuid;
use crate::{CatalogError, Result};

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A product owned by one administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Immutable identifier.
    pub uuid: Uuid,
    /// Product name.
    pub name: String,
    /// URL of the product image.
    pub image_url: String,
    /// Owning administrator; never reassigned.
    pub admin_uuid: Uuid,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Data for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Product name.
    pub name: String,
    /// URL of the product image.
    pub image_url: String,
    /// Owning administrator.
    pub admin_uuid: Uuid,
}

/// Changes applied to an existing product.
///
/// Ownership is deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    /// New name.
    pub name: Option<String>,
    /// New image URL.
    pub image_url: Option<String>,
}

/// A variant belonging to one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    /// Immutable identifier.
    pub uuid: Uuid,
    /// Variant name.
    pub name: String,
    /// Units in stock.
    pub quantity: i64,
    /// Owning product; never reassigned.
    pub product_uuid: Uuid,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Data for creating a variant.
#[derive(Debug, Clone)]
pub struct NewVariant {
    /// Variant name.
    pub name: String,
    /// Units in stock.
    pub quantity: i64,
    /// Owning product.
    pub product_uuid: Uuid,
}

/// Changes applied to an existing variant.
#[derive(Debug, Clone, Default)]
pub struct VariantUpdate {
    /// New name.
    pub name: Option<String>,
    /// New quantity.
    pub quantity: Option<i64>,
}

/// Name filter for listings (case-insensitive substring).
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Substring the name must contain.
    pub name: Option<String>,
}

impl ListFilter {
    /// Build a filter from an optional query value; blank values match everything.
    pub fn by_name(name: Option<&str>) -> Self {
        Self {
            name: name
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
}

impl Page {
    /// Create a page, rejecting zero values and capping the size.
    pub fn new(page: u32, page_size: u32) -> Result<Self> {
        if page == 0 {
            return Err(CatalogError::Validation("page must be at least 1".to_string()));
        }
        if page_size == 0 {
            return Err(CatalogError::Validation(
                "pageSize must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            page,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    /// Number of rows to return.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub uuid: String,
    pub name: String,
    pub image_url: String,
    pub admin_uuid: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = CatalogError;

    fn try_from(row: ProductRow) -> Result<Self> {
        Ok(Self {
            uuid: parse_uuid(&row.uuid)?,
            name: row.name,
            image_url: row.image_url,
            admin_uuid: parse_uuid(&row.admin_uuid)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct VariantRow {
    pub uuid: String,
    pub name: String,
    pub quantity: i64,
    pub product_uuid: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<VariantRow> for Variant {
    type Error = CatalogError;

    fn try_from(row: VariantRow) -> Result<Self> {
        Ok(Self {
            uuid: parse_uuid(&row.uuid)?,
            name: row.name,
            quantity: row.quantity,
            product_uuid: parse_uuid(&row.product_uuid)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
