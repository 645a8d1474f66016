//! Web API Variant Tests
//!
//! Integration tests for variant creation, listing, update and deletion.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{bearer, str_field, TestApp};

#[tokio::test]
async fn test_create_variant() {
    let app = TestApp::new().await;
    let (_, token) = app.admin("Ana", "ana@x.com").await;
    let product = app.create_product(&token, "Shirt").await;
    let product_uuid = str_field(&product, "uuid");

    let response = app
        .server
        .post(&format!("/products/{product_uuid}/variants"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "variant_name": "Small", "quantity": 0 }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let variant = &response.json::<Value>()["variant"];
    assert_eq!(variant["name"], "Small");
    assert_eq!(variant["quantity"], 0);
    assert_eq!(variant["product_uuid"], product["uuid"]);
}

#[tokio::test]
async fn test_create_variant_validation() {
    let app = TestApp::new().await;
    let (_, token) = app.admin("Ana", "ana@x.com").await;
    let product = app.create_product(&token, "Shirt").await;
    let product_uuid = str_field(&product, "uuid");

    let response = app
        .server
        .post(&format!("/products/{product_uuid}/variants"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "variant_name": "Small", "quantity": -1 }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json::<Value>()["details"]["quantity"].is_array());

    let response = app
        .server
        .post(&format!("/products/{product_uuid}/variants"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "variant_name": "   ", "quantity": 1 }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_variant_missing_product() {
    let app = TestApp::new().await;
    let (_, token) = app.admin("Ana", "ana@x.com").await;

    let response = app
        .server
        .post(&format!("/products/{}/variants", uuid::Uuid::new_v4()))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "variant_name": "Small", "quantity": 1 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_variants() {
    let app = TestApp::new().await;
    let (_, ana) = app.admin("Ana", "ana@x.com").await;
    let (_, bob) = app.admin("Bob", "bob@x.com").await;

    let shirt = app.create_product(&ana, "Shirt").await;
    let hat = app.create_product(&bob, "Hat").await;
    let shirt_uuid = str_field(&shirt, "uuid");
    app.create_variant(&ana, shirt_uuid, "Small Blue", 1).await;
    app.create_variant(&ana, shirt_uuid, "Large Red", 2).await;
    app.create_variant(&bob, str_field(&hat, "uuid"), "Blue Cap", 3).await;

    let response = app
        .server
        .get("/variants")
        .add_header(AUTHORIZATION, bearer(&ana))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["variants"].as_array().unwrap().len(), 3);
    assert_eq!(body["pagination"]["total"], 3);

    let response = app
        .server
        .get("/variants")
        .add_query_param("variantName", "BLUE")
        .add_query_param("pageSize", 1)
        .add_query_param("page", 2)
        .add_header(AUTHORIZATION, bearer(&ana))
        .await;
    let body: Value = response.json();
    assert_eq!(body["variants"].as_array().unwrap().len(), 1);
    assert_eq!(body["variants"][0]["name"], "Blue Cap");
    assert_eq!(body["pagination"]["total"], 2);

    let response = app
        .server
        .get(&format!("/products/{shirt_uuid}/variants"))
        .add_header(AUTHORIZATION, bearer(&bob))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let names: Vec<&str> = body["variants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Small Blue", "Large Red"]);
}

#[tokio::test]
async fn test_get_variant() {
    let app = TestApp::new().await;
    let (_, token) = app.admin("Ana", "ana@x.com").await;
    let product = app.create_product(&token, "Shirt").await;
    let variant = app
        .create_variant(&token, str_field(&product, "uuid"), "Small", 4)
        .await;

    let response = app
        .server
        .get(&format!("/variants/{}", str_field(&variant, "uuid")))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["variant"]["quantity"], 4);

    app.server
        .get(&format!("/variants/{}", uuid::Uuid::new_v4()))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .get("/variants/xyz")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_variant() {
    let app = TestApp::new().await;
    let (_, token) = app.admin("Ana", "ana@x.com").await;
    let product = app.create_product(&token, "Shirt").await;
    let variant = app
        .create_variant(&token, str_field(&product, "uuid"), "Small", 4)
        .await;
    let variant_uuid = str_field(&variant, "uuid");

    let response = app
        .server
        .put(&format!("/variants/{variant_uuid}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "variant_name": "Medium", "quantity": 9 }))
        .await;
    response.assert_status_ok();
    let updated = &response.json::<Value>()["variant"];
    assert_eq!(updated["name"], "Medium");
    assert_eq!(updated["quantity"], 9);
    assert_eq!(updated["product_uuid"], product["uuid"]);

    let response = app
        .server
        .delete(&format!("/variants/{variant_uuid}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["variant"]["name"], "Medium");

    app.server
        .get(&format!("/variants/{variant_uuid}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
