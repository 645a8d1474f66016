//! Router configuration for the catalog API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_product, create_variant, delete_product, delete_variant, get_product, get_variant,
    list_product_variants, list_products, list_variants, login, me, register, update_product,
    update_variant, AppState,
};
use super::middleware::{
    authenticate, create_cors_layer, require_owner, ProductOwnership, VariantOwnership,
};

/// Room for multipart boundaries and text fields on top of the image itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the main API router.
///
/// Route groups:
/// - public: register, login
/// - authenticated: reads, product creation, `/auth/me`
/// - owner-only: mutations of an existing product or variant
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    let read_routes = Router::new()
        .route("/auth/me", get(me))
        .route("/products", get(list_products).post(create_product))
        .route("/products/:product_id", get(get_product))
        .route("/products/:product_id/variants", get(list_product_variants))
        .route("/variants", get(list_variants))
        .route("/variants/:variant_id", get(get_variant));

    let product_owner_routes = Router::new()
        .route(
            "/products/:product_id",
            put(update_product).delete(delete_product),
        )
        .route("/products/:product_id/variants", post(create_variant))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_owner::<ProductOwnership>,
        ));

    let variant_owner_routes = Router::new()
        .route(
            "/variants/:variant_id",
            put(update_variant).delete(delete_variant),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_owner::<VariantOwnership>,
        ));

    let protected_routes = read_routes
        .merge(product_owner_routes)
        .merge(variant_owner_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            authenticate,
        ));

    let body_limit = usize::try_from(app_state.max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
