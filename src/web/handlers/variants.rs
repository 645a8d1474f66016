//! Variant handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

use super::{parse_path_uuid, AppState};
use crate::catalog::{Variant, VariantRepository, VariantUpdate};
use crate::web::dto::{
    ListQuery, PaginationMeta, ValidatedJson, VariantBody, VariantListResponse, VariantRequest,
};
use crate::web::error::ApiError;
use crate::web::middleware::Owned;

/// GET /variants - List variants across all products.
pub async fn list_variants(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<VariantListResponse>, ApiError> {
    let page = query.page()?;
    let filter = query.variant_filter();

    let repo = VariantRepository::new(state.db.pool());
    let variants = repo.list(&filter, page).await?;
    let total = repo.count(&filter).await?;

    Ok(Json(VariantListResponse {
        variants,
        pagination: PaginationMeta::new(page, total),
    }))
}

/// GET /variants/:variant_id
pub async fn get_variant(
    State(state): State<Arc<AppState>>,
    Path(variant_id): Path<String>,
) -> Result<Json<VariantBody>, ApiError> {
    let uuid = parse_path_uuid(&variant_id, "variant")?;
    let variant = VariantRepository::new(state.db.pool())
        .get_by_uuid(uuid)
        .await?
        .ok_or_else(|| ApiError::not_found("variant not found"))?;

    Ok(Json(VariantBody { variant }))
}

/// PUT /variants/:variant_id - Update a variant of an owned product.
pub async fn update_variant(
    State(state): State<Arc<AppState>>,
    Owned(variant): Owned<Variant>,
    ValidatedJson(req): ValidatedJson<VariantRequest>,
) -> Result<Json<VariantBody>, ApiError> {
    let update = VariantUpdate {
        name: Some(req.variant_name.trim().to_string()),
        quantity: Some(req.quantity),
    };
    let variant = VariantRepository::new(state.db.pool())
        .update(variant.uuid, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("variant not found"))?;
    info!("Updated variant {}", variant.uuid);

    Ok(Json(VariantBody { variant }))
}

/// DELETE /variants/:variant_id - Delete a variant of an owned product.
pub async fn delete_variant(
    State(state): State<Arc<AppState>>,
    Owned(variant): Owned<Variant>,
) -> Result<Json<VariantBody>, ApiError> {
    let deleted = VariantRepository::new(state.db.pool())
        .delete(variant.uuid)
        .await?;
    if !deleted {
        return Err(ApiError::not_found("variant not found"));
    }
    info!("Deleted variant {}", variant.uuid);

    Ok(Json(VariantBody { variant }))
}
