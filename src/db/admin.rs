//! Administrator model.

use uuid::Uuid;

use crate::{CatalogError, Result};

/// A registered administrator.
///
/// Not serializable: responses go through a DTO so the password hash never
/// leaves the service.
#[derive(Debug, Clone)]
pub struct Admin {
    /// Immutable identifier generated at registration.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Email address (unique, case-insensitive).
    pub email: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Data for registering a new administrator.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password hash (must already be hashed).
    pub password: String,
}

impl NewAdmin {
    /// Create registration data from a name, email and password hash.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password_hash.into(),
        }
    }
}

/// Raw row as stored in the admins table.
#[derive(sqlx::FromRow)]
pub(crate) struct AdminRow {
    pub uuid: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<AdminRow> for Admin {
    type Error = CatalogError;

    fn try_from(row: AdminRow) -> Result<Self> {
        Ok(Self {
            uuid: parse_uuid(&row.uuid)?,
            name: row.name,
            email: row.email,
            password: row.password,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Parse a stored UUID column.
pub(crate) fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| CatalogError::Database(format!("invalid stored uuid {value:?}: {e}")))
}
