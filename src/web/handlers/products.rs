//! Product handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use super::{parse_path_uuid, AppState};
use crate::catalog::{
    ListFilter, NewProduct, NewVariant, Page, Product, ProductRepository, ProductUpdate,
    VariantRepository, MAX_PAGE_SIZE,
};
use crate::web::dto::{
    ListQuery, PaginationMeta, ProductBody, ProductDetailResponse, ProductForm,
    ProductListResponse, ValidatedJson, VariantBody, VariantListResponse, VariantRequest,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthAdmin, Owned};
use crate::CatalogError;

/// Store the uploaded file, if any, and return its URL.
async fn store_image(
    state: &AppState,
    form: &mut ProductForm,
) -> Result<Option<String>, ApiError> {
    match form.image.take() {
        Some(image) => Ok(Some(state.images.upload(image).await?)),
        None => Ok(None),
    }
}

async fn find_product(state: &AppState, raw_id: &str) -> Result<Product, ApiError> {
    let uuid = parse_path_uuid(raw_id, "product")?;
    ProductRepository::new(state.db.pool())
        .get_by_uuid(uuid)
        .await?
        .ok_or_else(|| ApiError::not_found("product not found"))
}

/// GET /products - List products, optionally filtered by name.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let page = query.page()?;
    let filter = query.product_filter();

    let repo = ProductRepository::new(state.db.pool());
    let products = repo.list(&filter, page).await?;
    let total = repo.count(&filter).await?;

    Ok(Json(ProductListResponse {
        products,
        pagination: PaginationMeta::new(page, total),
    }))
}

/// POST /products - Create a product owned by the caller.
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
    mut form: ProductForm,
) -> Result<(StatusCode, Json<ProductBody>), ApiError> {
    let name = form.validated_name()?;

    let image_url = match store_image(&state, &mut form).await? {
        Some(url) => url,
        None => form
            .non_empty_image_url()
            .ok_or_else(|| ApiError::invalid("An image file or image_url is required"))?,
    };

    let product = ProductRepository::new(state.db.pool())
        .create(&NewProduct {
            name,
            image_url,
            admin_uuid: identity.admin_uuid,
        })
        .await?;
    info!(
        "Administrator {} created product {}",
        identity.admin_uuid, product.uuid
    );

    Ok((StatusCode::CREATED, Json(ProductBody { product })))
}

/// GET /products/:product_id - A product with its variants.
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductDetailResponse>, ApiError> {
    let product = find_product(&state, &product_id).await?;

    let page = Page::new(1, MAX_PAGE_SIZE)?;
    let variants = VariantRepository::new(state.db.pool())
        .list_by_product(product.uuid, &ListFilter::default(), page)
        .await?;

    Ok(Json(ProductDetailResponse { product, variants }))
}

/// PUT /products/:product_id - Update an owned product.
///
/// A new file replaces the image; otherwise a non-empty `image_url` does;
/// otherwise the current image is kept.
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Owned(product): Owned<Product>,
    mut form: ProductForm,
) -> Result<Json<ProductBody>, ApiError> {
    let name = form.validated_name()?;

    let image_url = match store_image(&state, &mut form).await? {
        Some(url) => Some(url),
        None => form.non_empty_image_url(),
    };

    let update = ProductUpdate {
        name: Some(name),
        image_url,
    };
    let product = ProductRepository::new(state.db.pool())
        .update(product.uuid, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("product not found"))?;
    info!("Updated product {}", product.uuid);

    Ok(Json(ProductBody { product }))
}

/// DELETE /products/:product_id - Delete an owned product without variants.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Owned(product): Owned<Product>,
) -> Result<Json<ProductBody>, ApiError> {
    let deleted = ProductRepository::new(state.db.pool())
        .delete(product.uuid)
        .await
        .map_err(|e| match e {
            CatalogError::Conflict(_) => ApiError::conflict(
                "Product still has variants, delete its variants first",
            ),
            other => ApiError::from(other),
        })?;

    if !deleted {
        return Err(ApiError::not_found("product not found"));
    }
    info!("Deleted product {}", product.uuid);

    Ok(Json(ProductBody { product }))
}

/// GET /products/:product_id/variants - Variants of one product.
pub async fn list_product_variants(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<VariantListResponse>, ApiError> {
    let product = find_product(&state, &product_id).await?;
    let page = query.page()?;
    let filter = query.variant_filter();

    let repo = VariantRepository::new(state.db.pool());
    let variants = repo.list_by_product(product.uuid, &filter, page).await?;
    let total = repo.count_by_product(product.uuid, &filter).await?;

    Ok(Json(VariantListResponse {
        variants,
        pagination: PaginationMeta::new(page, total),
    }))
}

/// POST /products/:product_id/variants - Add a variant to an owned product.
pub async fn create_variant(
    State(state): State<Arc<AppState>>,
    Owned(product): Owned<Product>,
    ValidatedJson(req): ValidatedJson<VariantRequest>,
) -> Result<(StatusCode, Json<VariantBody>), ApiError> {
    let variant = VariantRepository::new(state.db.pool())
        .create(&NewVariant {
            name: req.variant_name.trim().to_string(),
            quantity: req.quantity,
            product_uuid: product.uuid,
        })
        .await?;
    info!(
        "Created variant {} for product {}",
        variant.uuid, product.uuid
    );

    Ok((StatusCode::CREATED, Json(VariantBody { variant })))
}
