//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{error, info};

use super::AppState;
use crate::auth::{hash_password, verify_password};
use crate::db::{AdminRepository, NewAdmin};
use crate::web::dto::{AdminBody, LoginRequest, LoginResponse, RegisterRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthAdmin;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Run password hashing work off the async executor.
///
/// A panicked or cancelled task is an internal error, never a credential outcome.
async fn run_blocking<T, F>(work: F, failure: &'static str) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!("Password task failed: {}", e);
        ApiError::internal(failure)
    })
}

/// POST /auth/register - Register a new administrator.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AdminBody>), ApiError> {
    let name = req.name.trim();
    let email = req.email.trim();

    let repo = AdminRepository::new(state.db.pool());
    if repo.email_exists(email).await? {
        return Err(ApiError::conflict("Email is already registered"));
    }

    let password = req.password;
    let digest = run_blocking(
        move || hash_password(&password),
        "Failed to register administrator",
    )
    .await?
    .map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to register administrator")
    })?;

    let admin = repo.create(&NewAdmin::new(name, email, digest)).await?;
    info!("Registered administrator {}", admin.uuid);

    Ok((
        StatusCode::CREATED,
        Json(AdminBody {
            admin: admin.into(),
        }),
    ))
}

/// POST /auth/login - Exchange credentials for a session token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let repo = AdminRepository::new(state.db.pool());
    let admin = repo
        .get_by_email(req.email.trim())
        .await?
        .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    let digest = admin.password.clone();
    let password = req.password;
    let valid = run_blocking(
        move || verify_password(&digest, &password),
        "Failed to sign in",
    )
    .await?;
    if !valid {
        info!("Failed login for administrator {}", admin.uuid);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(admin.uuid, &admin.email)?;
    info!("Administrator {} signed in", admin.uuid);

    Ok(Json(LoginResponse {
        token,
        expires_in: state.tokens.ttl_secs(),
    }))
}

/// GET /auth/me - The administrator behind the presented token.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthAdmin(identity): AuthAdmin,
) -> Result<Json<AdminBody>, ApiError> {
    let admin = AdminRepository::new(state.db.pool())
        .get_by_uuid(identity.admin_uuid)
        .await?
        .ok_or_else(|| ApiError::not_found("admin not found"))?;

    Ok(Json(AdminBody {
        admin: admin.into(),
    }))
}
