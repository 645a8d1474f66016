//! Variant repository.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::types::{ListFilter, NewVariant, Page, Variant, VariantRow, VariantUpdate};
use crate::db::admin::parse_uuid;
use crate::{CatalogError, Result};

const VARIANT_COLUMNS: &str = "uuid, name, quantity, product_uuid, created_at, updated_at";

/// Repository for variant CRUD operations.
pub struct VariantRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> VariantRepository<'a> {
    /// Create a new VariantRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a variant under `new_variant.product_uuid`.
    pub async fn create(&self, new_variant: &NewVariant) -> Result<Variant> {
        if new_variant.quantity < 0 {
            return Err(CatalogError::Validation(
                "quantity must not be negative".to_string(),
            ));
        }

        let uuid = Uuid::new_v4();

        sqlx::query("INSERT INTO variants (uuid, name, quantity, product_uuid) VALUES (?, ?, ?, ?)")
            .bind(uuid.to_string())
            .bind(&new_variant.name)
            .bind(new_variant.quantity)
            .bind(new_variant.product_uuid.to_string())
            .execute(self.pool)
            .await?;

        self.get_by_uuid(uuid)
            .await?
            .ok_or_else(|| CatalogError::NotFound("variant".to_string()))
    }

    /// Get a variant by UUID.
    pub async fn get_by_uuid(&self, uuid: Uuid) -> Result<Option<Variant>> {
        let row: Option<VariantRow> = sqlx::query_as(&format!(
            "SELECT {VARIANT_COLUMNS} FROM variants WHERE uuid = ?"
        ))
        .bind(uuid.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(Variant::try_from).transpose()
    }

    /// Resolve the product a variant belongs to.
    ///
    /// Returns None when the variant does not exist.
    pub async fn owner_chain(&self, variant_uuid: Uuid) -> Result<Option<Uuid>> {
        let product_uuid: Option<String> =
            sqlx::query_scalar("SELECT product_uuid FROM variants WHERE uuid = ?")
                .bind(variant_uuid.to_string())
                .fetch_optional(self.pool)
                .await?;

        product_uuid.as_deref().map(parse_uuid).transpose()
    }

    /// Update a variant. Returns None if it does not exist.
    pub async fn update(&self, uuid: Uuid, update: &VariantUpdate) -> Result<Option<Variant>> {
        if matches!(update.quantity, Some(q) if q < 0) {
            return Err(CatalogError::Validation(
                "quantity must not be negative".to_string(),
            ));
        }
        if update.name.is_none() && update.quantity.is_none() {
            return self.get_by_uuid(uuid).await;
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE variants SET updated_at = datetime('now')");

        if let Some(ref name) = update.name {
            query.push(", name = ");
            query.push_bind(name.clone());
        }
        if let Some(quantity) = update.quantity {
            query.push(", quantity = ");
            query.push_bind(quantity);
        }

        query.push(" WHERE uuid = ");
        query.push_bind(uuid.to_string());

        let result = query.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_uuid(uuid).await
    }

    /// Delete a variant. Returns true if a variant was deleted.
    pub async fn delete(&self, uuid: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM variants WHERE uuid = ?")
            .bind(uuid.to_string())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List variants across all products, in creation order.
    pub async fn list(&self, filter: &ListFilter, page: Page) -> Result<Vec<Variant>> {
        self.list_where(None, filter, page).await
    }

    /// Count variants across all products.
    pub async fn count(&self, filter: &ListFilter) -> Result<i64> {
        self.count_where(None, filter).await
    }

    /// List the variants of one product.
    pub async fn list_by_product(
        &self,
        product_uuid: Uuid,
        filter: &ListFilter,
        page: Page,
    ) -> Result<Vec<Variant>> {
        self.list_where(Some(product_uuid), filter, page).await
    }

    /// Count the variants of one product.
    pub async fn count_by_product(&self, product_uuid: Uuid, filter: &ListFilter) -> Result<i64> {
        self.count_where(Some(product_uuid), filter).await
    }

    async fn list_where(
        &self,
        product_uuid: Option<Uuid>,
        filter: &ListFilter,
        page: Page,
    ) -> Result<Vec<Variant>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {VARIANT_COLUMNS} FROM variants"));
        push_conditions(&mut query, product_uuid, filter);
        query.push(" ORDER BY rowid LIMIT ");
        query.push_bind(page.limit());
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let rows: Vec<VariantRow> = query.build_query_as().fetch_all(self.pool).await?;
        rows.into_iter().map(Variant::try_from).collect()
    }

    async fn count_where(&self, product_uuid: Option<Uuid>, filter: &ListFilter) -> Result<i64> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM variants");
        push_conditions(&mut query, product_uuid, filter);

        let count: i64 = query.build_query_scalar().fetch_one(self.pool).await?;
        Ok(count)
    }
}

fn push_conditions(
    query: &mut QueryBuilder<'_, Sqlite>,
    product_uuid: Option<Uuid>,
    filter: &ListFilter,
) {
    let mut has_where = false;

    if let Some(product_uuid) = product_uuid {
        query.push(" WHERE product_uuid = ");
        query.push_bind(product_uuid.to_string());
        has_where = true;
    }

    if let Some(ref name) = filter.name {
        query.push(if has_where { " AND " } else { " WHERE " });
        query.push("instr(lower(name), lower(");
        query.push_bind(name.clone());
        query.push(")) > 0");
    }
}
