//! Request DTOs for the catalog API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{no_control_chars, not_empty_trimmed};
use crate::catalog::{ListFilter, Page, DEFAULT_PAGE_SIZE};
use crate::web::error::ApiError;

/// Maximum length of display names and catalog item names.
pub const MAX_NAME_LENGTH: usize = 100;

/// Administrator registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub name: String,
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters"
    ))]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// JSON body for creating or updating a product.
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    /// Product name.
    #[serde(default)]
    pub name: Option<String>,
    /// Externally hosted image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Variant create/update request.
#[derive(Debug, Deserialize, Validate)]
pub struct VariantRequest {
    /// Variant name.
    #[validate(
        length(min = 1, max = 100, message = "Variant name must be between 1 and 100 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub variant_name: String,
    /// Units in stock.
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i64,
}

/// Query string for listings.
///
/// Numbers are kept as strings so malformed values become a 400 with a
/// readable message instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: Option<String>,
    /// Items per page.
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
    /// Product name filter.
    #[serde(rename = "productName")]
    pub product_name: Option<String>,
    /// Variant name filter.
    #[serde(rename = "variantName")]
    pub variant_name: Option<String>,
}

impl ListQuery {
    /// Requested page, defaulting to the first page of `DEFAULT_PAGE_SIZE`.
    pub fn page(&self) -> Result<Page, ApiError> {
        let page = parse_positive(self.page.as_deref(), "page", 1)?;
        let page_size = parse_positive(self.page_size.as_deref(), "pageSize", DEFAULT_PAGE_SIZE)?;
        Page::new(page, page_size).map_err(|e| ApiError::bad_request(e.to_string()))
    }

    /// Filter on product names.
    pub fn product_filter(&self) -> ListFilter {
        ListFilter::by_name(self.product_name.as_deref())
    }

    /// Filter on variant names.
    pub fn variant_filter(&self) -> ListFilter {
        ListFilter::by_name(self.variant_name.as_deref())
    }
}

fn parse_positive(value: Option<&str>, field: &str, default: u32) -> Result<u32, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(ApiError::bad_request(format!(
                "{field} must be a positive integer"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::error::ErrorCode;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_valid() {
        assert!(register("Ana", "ana@x.com", "secret123").validate().is_ok());
    }

    #[test]
    fn test_register_invalid_fields() {
        let errors = register("   ", "not-an-email", "short")
            .validate()
            .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_register_password_bounds() {
        assert!(register("Ana", "ana@x.com", "1234567").validate().is_err());
        assert!(register("Ana", "ana@x.com", "12345678").validate().is_ok());

        let long = "x".repeat(129);
        assert!(register("Ana", "ana@x.com", &long).validate().is_err());
        let max = "x".repeat(128);
        assert!(register("Ana", "ana@x.com", &max).validate().is_ok());
    }

    #[test]
    fn test_variant_request_negative_quantity() {
        let req = VariantRequest {
            variant_name: "Small".to_string(),
            quantity: -1,
        };
        assert!(req.validate().is_err());

        let req = VariantRequest {
            variant_name: "Small".to_string(),
            quantity: 0,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_list_query_defaults() {
        let page = ListQuery::default().page().unwrap();
        assert_eq!(page, Page::default());
    }

    #[test]
    fn test_list_query_rejects_bad_numbers() {
        for raw in ["0", "-1", "abc", "1.5"] {
            let query = ListQuery {
                page: Some(raw.to_string()),
                ..ListQuery::default()
            };
            let err = query.page().unwrap_err();
            assert_eq!(err.code(), ErrorCode::BadRequest);
        }

        let query = ListQuery {
            page_size: Some("0".to_string()),
            ..ListQuery::default()
        };
        assert!(query.page().is_err());
    }

    #[test]
    fn test_list_query_filters() {
        let query = ListQuery {
            product_name: Some(" widget ".to_string()),
            variant_name: Some("".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(query.product_filter().name.as_deref(), Some("widget"));
        assert!(query.variant_filter().name.is_none());
    }
}
