//! Authentication gate.
//!
//! [`authenticate`] verifies the bearer token on every protected route and
//! stores the resulting [`Identity`] in the request extensions. Handlers
//! read it back with the [`AuthAdmin`] extractor.

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::auth::{extract_bearer, Identity, TokenError};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Reject the request with 401 unless it carries a valid session token.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let identity = extract_bearer(header)
        .and_then(|token| state.tokens.verify(token))
        .map_err(|e| {
            debug!("Rejected credential on {}: {}", request.uri().path(), e);
            ApiError::from(e)
        })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Extractor for the authenticated administrator.
///
/// Fails closed with 401 when the authentication gate did not run.
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthAdmin)
            .ok_or_else(|| ApiError::from(TokenError::NoCredential))
    }
}
