//! Shared helpers for the API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;
use uuid::Uuid;

use catalog::db::{AdminRepository, NewAdmin};
use catalog::web::{create_health_router, create_router, AppState};
use catalog::{Database, LocalImageStore, TokenCodec};

/// Signing secret used by every test server.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// Upload limit used by every test server.
pub const MAX_UPLOAD: u64 = 16 * 1024;

/// A test server with direct access to its database and token codec.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub codec: TokenCodec,
    pub images: TempDir,
}

impl TestApp {
    /// Create a test server with an in-memory database and a temporary image directory.
    pub async fn new() -> Self {
        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");
        let images = TempDir::new().expect("Failed to create image directory");
        let store = LocalImageStore::new(images.path(), "/images", MAX_UPLOAD)
            .expect("Failed to create image store");

        let app_state = Arc::new(AppState::new(
            db.clone(),
            TokenCodec::new(TEST_SECRET),
            Arc::new(store),
            MAX_UPLOAD,
        ));
        let router = create_router(app_state, &[]).merge(create_health_router());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            db,
            codec: TokenCodec::new(TEST_SECRET),
            images,
        }
    }

    /// Insert an administrator directly and return their UUID and a valid token.
    ///
    /// Skips password hashing; use the register/login endpoints when the
    /// credentials themselves are under test.
    pub async fn admin(&self, name: &str, email: &str) -> (Uuid, String) {
        let admin = AdminRepository::new(self.db.pool())
            .create(&NewAdmin::new(name, email, "not-a-real-hash"))
            .await
            .expect("Failed to create admin");
        let token = self
            .codec
            .issue(admin.uuid, &admin.email)
            .expect("Failed to issue token");
        (admin.uuid, token)
    }

    /// Create a product through the API and return the `product` object.
    pub async fn create_product(&self, token: &str, name: &str) -> Value {
        let response = self
            .server
            .post("/products")
            .add_header(AUTHORIZATION, bearer(token))
            .json(&json!({
                "name": name,
                "image_url": format!("https://img.example/{}.png", name.to_lowercase()),
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["product"].clone()
    }

    /// Create a variant through the API and return the `variant` object.
    pub async fn create_variant(
        &self,
        token: &str,
        product_uuid: &str,
        name: &str,
        quantity: i64,
    ) -> Value {
        let response = self
            .server
            .post(&format!("/products/{product_uuid}/variants"))
            .add_header(AUTHORIZATION, bearer(token))
            .json(&json!({
                "variant_name": name,
                "quantity": quantity,
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["variant"].clone()
    }
}

/// Format a bearer authorization header value.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Read a string field out of a JSON object.
pub fn str_field<'a>(value: &'a Value, field: &str) -> &'a str {
    value[field].as_str().expect("field is not a string")
}
