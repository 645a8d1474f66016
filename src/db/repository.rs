//! Administrator repository.
//!
//! This module is the credential store: it persists administrators and looks
//! them up by UUID or email.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::admin::{Admin, AdminRow, NewAdmin};
use crate::{CatalogError, Result};

/// Repository for administrator records.
pub struct AdminRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new AdminRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new administrator with a freshly generated UUID.
    ///
    /// Returns [`CatalogError::Conflict`] if the email is already registered.
    pub async fn create(&self, new_admin: &NewAdmin) -> Result<Admin> {
        let uuid = Uuid::new_v4();

        sqlx::query("INSERT INTO admins (uuid, name, email, password) VALUES (?, ?, ?, ?)")
            .bind(uuid.to_string())
            .bind(&new_admin.name)
            .bind(&new_admin.email)
            .bind(&new_admin.password)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CatalogError::Conflict("email is already registered".to_string())
                } else {
                    CatalogError::from(e)
                }
            })?;

        self.get_by_uuid(uuid)
            .await?
            .ok_or_else(|| CatalogError::NotFound("admin".to_string()))
    }

    /// Get an administrator by UUID.
    pub async fn get_by_uuid(&self, uuid: Uuid) -> Result<Option<Admin>> {
        let row: Option<AdminRow> = sqlx::query_as(
            "SELECT uuid, name, email, password, created_at, updated_at
             FROM admins WHERE uuid = ?",
        )
        .bind(uuid.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(Admin::try_from).transpose()
    }

    /// Get an administrator by email (case-insensitive).
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let row: Option<AdminRow> = sqlx::query_as(
            "SELECT uuid, name, email, password, created_at, updated_at
             FROM admins WHERE email = ? COLLATE NOCASE",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(Admin::try_from).transpose()
    }

    /// Check whether an email is already registered.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM admins WHERE email = ? COLLATE NOCASE)",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }
}

/// Whether a sqlx error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
