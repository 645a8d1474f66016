//! Ownership guard.
//!
//! Mutating routes on owned resources are wrapped in [`require_owner`],
//! parameterised by an [`OwnershipResolver`] that knows how to load the
//! resource named in the path and find the administrator that owns it.
//! Supporting a new kind of owned resource only needs a new resolver.
//!
//! The guard runs after [`authenticate`](super::authenticate) and checks, in
//! order: identity present (401), identifier well formed (400), resource
//! exists (404), caller is the owner (403). On success the loaded resource is
//! stored in the request extensions for the [`Owned`] extractor.

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{Identity, TokenError};
use crate::catalog::{Product, ProductRepository, Variant, VariantRepository};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::{CatalogError, Database, Result};

const FORBIDDEN_MESSAGE: &str = "You don't have permission to perform this operation";

/// Looks up an owned resource and its owning administrator.
#[async_trait]
pub trait OwnershipResolver: Send + Sync + 'static {
    /// The resource handed to the handler once ownership is confirmed.
    type Resource: Clone + Send + Sync + 'static;

    /// Name of the path parameter holding the resource identifier.
    const PATH_PARAM: &'static str;

    /// Human readable resource kind, used in error messages.
    const KIND: &'static str;

    /// Load the resource and the UUID of the administrator that owns it.
    async fn resolve(db: &Database, id: Uuid) -> Result<Option<(Self::Resource, Uuid)>>;

    /// Load the resource and confirm that `identity` owns it.
    async fn authorize(db: &Database, id: Uuid, identity: &Identity) -> Result<Self::Resource> {
        let (resource, owner) = Self::resolve(db, id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(Self::KIND.to_string()))?;

        if owner != identity.admin_uuid {
            debug!(
                "Admin {} denied access to {} {}",
                identity.admin_uuid,
                Self::KIND,
                id
            );
            return Err(CatalogError::Authorization(FORBIDDEN_MESSAGE.to_string()));
        }
        Ok(resource)
    }
}

/// Products are owned directly by their administrator.
pub struct ProductOwnership;

#[async_trait]
impl OwnershipResolver for ProductOwnership {
    type Resource = Product;

    const PATH_PARAM: &'static str = "product_id";
    const KIND: &'static str = "product";

    async fn resolve(db: &Database, id: Uuid) -> Result<Option<(Product, Uuid)>> {
        let product = ProductRepository::new(db.pool()).get_by_uuid(id).await?;
        Ok(product.map(|p| {
            let owner = p.admin_uuid;
            (p, owner)
        }))
    }
}

/// Variants are owned through their product.
pub struct VariantOwnership;

#[async_trait]
impl OwnershipResolver for VariantOwnership {
    type Resource = Variant;

    const PATH_PARAM: &'static str = "variant_id";
    const KIND: &'static str = "variant";

    async fn resolve(db: &Database, id: Uuid) -> Result<Option<(Variant, Uuid)>> {
        let variants = VariantRepository::new(db.pool());
        let Some(product_uuid) = variants.owner_chain(id).await? else {
            return Ok(None);
        };

        let Some((product, owner)) = ProductOwnership::resolve(db, product_uuid).await? else {
            // A variant always references an existing product
            warn!("Variant {} references missing product {}", id, product_uuid);
            return Ok(None);
        };

        let variant = variants.get_by_uuid(id).await?;
        debug!("Variant {} belongs to product {}", id, product.uuid);
        Ok(variant.map(|v| (v, owner)))
    }
}

/// A resource whose ownership by the caller has been verified.
#[derive(Debug, Clone)]
pub struct Owned<T>(pub T);

/// Reject the request unless the caller owns the resource named in the path.
pub async fn require_owner<R: OwnershipResolver>(
    State(state): State<Arc<AppState>>,
    Path(params): Path<HashMap<String, String>>,
    mut request: Request<Body>,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    let identity = request
        .extensions()
        .get::<Identity>()
        .cloned()
        .ok_or(CatalogError::Authentication(TokenError::NoCredential))?;

    let id = params
        .get(R::PATH_PARAM)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(|| ApiError::bad_request(format!("Invalid {} UUID format", R::KIND)))?;

    let resource = R::authorize(&state.db, id, &identity).await?;
    request.extensions_mut().insert(Owned(resource));
    Ok(next.run(request).await)
}

#[async_trait]
impl<S, T> FromRequestParts<S> for Owned<T>
where
    S: Send + Sync,
    T: Clone + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts.extensions.get::<Owned<T>>().cloned().ok_or_else(|| {
            tracing::error!("Owned resource requested on a route without an ownership guard");
            ApiError::forbidden(FORBIDDEN_MESSAGE)
        })
    }
}
