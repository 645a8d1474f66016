//! Product repository.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::types::{ListFilter, NewProduct, Page, Product, ProductRow, ProductUpdate};
use crate::{CatalogError, Result};

const PRODUCT_COLUMNS: &str = "uuid, name, image_url, admin_uuid, created_at, updated_at";

/// Repository for product CRUD operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new ProductRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a product owned by `new_product.admin_uuid`.
    pub async fn create(&self, new_product: &NewProduct) -> Result<Product> {
        let uuid = Uuid::new_v4();

        sqlx::query("INSERT INTO products (uuid, name, image_url, admin_uuid) VALUES (?, ?, ?, ?)")
            .bind(uuid.to_string())
            .bind(&new_product.name)
            .bind(&new_product.image_url)
            .bind(new_product.admin_uuid.to_string())
            .execute(self.pool)
            .await?;

        self.get_by_uuid(uuid)
            .await?
            .ok_or_else(|| CatalogError::NotFound("product".to_string()))
    }

    /// Get a product by UUID.
    pub async fn get_by_uuid(&self, uuid: Uuid) -> Result<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE uuid = ?"
        ))
        .bind(uuid.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Update a product. Returns None if it does not exist.
    pub async fn update(&self, uuid: Uuid, update: &ProductUpdate) -> Result<Option<Product>> {
        if update.name.is_none() && update.image_url.is_none() {
            return self.get_by_uuid(uuid).await;
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE products SET updated_at = datetime('now')");

        if let Some(ref name) = update.name {
            query.push(", name = ");
            query.push_bind(name.clone());
        }
        if let Some(ref image_url) = update.image_url {
            query.push(", image_url = ");
            query.push_bind(image_url.clone());
        }

        query.push(" WHERE uuid = ");
        query.push_bind(uuid.to_string());

        let result = query.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_uuid(uuid).await
    }

    /// Delete a product.
    ///
    /// Returns true if a product was deleted. Fails with
    /// [`CatalogError::Conflict`] while variants still reference it.
    pub async fn delete(&self, uuid: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let has_variants: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM variants WHERE product_uuid = ?)")
                .bind(uuid.to_string())
                .fetch_one(&mut *tx)
                .await?;
        if has_variants {
            return Err(product_has_variants());
        }

        // The foreign key still rejects a variant inserted by a concurrent request
        let result = sqlx::query("DELETE FROM products WHERE uuid = ?")
            .bind(uuid.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    product_has_variants()
                }
                _ => CatalogError::from(e),
            })?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// List products matching the filter, in creation order.
    pub async fn list(&self, filter: &ListFilter, page: Page) -> Result<Vec<Product>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        push_name_filter(&mut query, filter);
        query.push(" ORDER BY rowid LIMIT ");
        query.push_bind(page.limit());
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let rows: Vec<ProductRow> = query.build_query_as().fetch_all(self.pool).await?;
        rows.into_iter().map(Product::try_from).collect()
    }

    /// Count products matching the filter.
    pub async fn count(&self, filter: &ListFilter) -> Result<i64> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM products");
        push_name_filter(&mut query, filter);

        let count: i64 = query.build_query_scalar().fetch_one(self.pool).await?;
        Ok(count)
    }
}

fn product_has_variants() -> CatalogError {
    CatalogError::Conflict("product still has variants".to_string())
}

/// Append a case-insensitive substring match on `name`.
fn push_name_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &ListFilter) {
    if let Some(ref name) = filter.name {
        query.push(" WHERE instr(lower(name), lower(");
        query.push_bind(name.clone());
        query.push(")) > 0");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{AdminRepository, NewAdmin};
    use crate::Database;

    async fn setup() -> (Database, Uuid) {
        let db = Database::open_in_memory().await.unwrap();
        let admin = AdminRepository::new(db.pool())
            .create(&NewAdmin::new("Ana", "ana@x.com", "hash"))
            .await
            .unwrap();
        (db, admin.uuid)
    }

    fn new_product(name: &str, admin_uuid: Uuid) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            image_url: format!("https://img.example/{name}.png"),
            admin_uuid,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (db, admin) = setup().await;
        let repo = ProductRepository::new(db.pool());

        let product = repo.create(&new_product("Widget", admin)).await.unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.admin_uuid, admin);

        let fetched = repo.get_by_uuid(product.uuid).await.unwrap().unwrap();
        assert_eq!(fetched, product);
    }

    #[tokio::test]
    async fn test_create_requires_existing_admin() {
        let (db, _) = setup().await;
        let repo = ProductRepository::new(db.pool());

        let result = repo.create(&new_product("Orphan", Uuid::new_v4())).await;
        assert!(matches!(result, Err(CatalogError::Database(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_owner() {
        let (db, admin) = setup().await;
        let repo = ProductRepository::new(db.pool());
        let product = repo.create(&new_product("Widget", admin)).await.unwrap();

        let update = ProductUpdate {
            name: Some("Gadget".to_string()),
            image_url: None,
        };
        let updated = repo.update(product.uuid, &update).await.unwrap().unwrap();

        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.image_url, product.image_url);
        assert_eq!(updated.admin_uuid, admin);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let (db, _) = setup().await;
        let repo = ProductRepository::new(db.pool());

        let update = ProductUpdate {
            name: Some("x".to_string()),
            image_url: None,
        };
        assert!(repo.update(Uuid::new_v4(), &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let (db, admin) = setup().await;
        let repo = ProductRepository::new(db.pool());
        let product = repo.create(&new_product("Widget", admin)).await.unwrap();

        assert!(repo.delete(product.uuid).await.unwrap());
        assert!(!repo.delete(product.uuid).await.unwrap());
        assert!(repo.get_by_uuid(product.uuid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_variant_reference_blocks_raw_delete() {
        let (db, admin) = setup().await;
        let product = ProductRepository::new(db.pool())
            .create(&new_product("Shirt", admin))
            .await
            .unwrap();
        sqlx::query("INSERT INTO variants (uuid, name, quantity, product_uuid) VALUES (?, ?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind("Small")
            .bind(1_i64)
            .bind(product.uuid.to_string())
            .execute(db.pool())
            .await
            .unwrap();

        // Bypasses the existence check; the schema alone must refuse it
        let err = sqlx::query("DELETE FROM products WHERE uuid = ?")
            .bind(product.uuid.to_string())
            .execute(db.pool())
            .await
            .unwrap_err();
        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_foreign_key_violation()),
            other => panic!("unexpected error: {other:?}"),
        }

        let result = ProductRepository::new(db.pool()).delete(product.uuid).await;
        assert!(matches!(result, Err(CatalogError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_filter_and_pagination() {
        let (db, admin) = setup().await;
        let repo = ProductRepository::new(db.pool());
        for name in ["Red Widget", "Blue Widget", "Gadget", "Green widget"] {
            repo.create(&new_product(name, admin)).await.unwrap();
        }

        let all = repo
            .list(&ListFilter::default(), Page::new(1, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].name, "Red Widget");

        let filter = ListFilter::by_name(Some("WIDGET"));
        assert_eq!(repo.count(&filter).await.unwrap(), 3);

        let first = repo.list(&filter, Page::new(1, 2).unwrap()).await.unwrap();
        let second = repo.list(&filter, Page::new(2, 2).unwrap()).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "Green widget");
    }
}
