//! End-to-end tests for the HTTP surface
//!
//! Each test drives the full router against a temporary SQLite store.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use catalogd::api::{create_router, AppState};
use catalogd::config::DatabaseConfig;
use catalogd::store;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt; // for oneshot

async fn test_app() -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}/catalog.db?mode=rwc", dir.path().display()),
        max_connections: 2,
    };

    let store = store::connect(&config).await.unwrap();
    (create_router(AppState::new(store)), dir)
}

fn sample_product(name: &str) -> Value {
    json!({
        "name": name,
        "description": "A sample product",
        "brand": "Acme",
        "category": "tools",
        "price": 19.5,
        "currency": "EUR",
        "stock": 7,
        "ean": "4006381333931",
        "color": "red",
        "size": "M",
        "availability": "in_stock",
        "internal_id": "SKU-001"
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, value) = send(app, json_request("POST", "/products", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    value
}

#[tokio::test]
async fn plain_text_is_fixed() {
    let (app, _dir) = test_app().await;

    let response = app.oneshot(get_request("/plain-text")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Hello, world!");
}

#[tokio::test]
async fn json_greeting_is_fixed() {
    let (app, _dir) = test_app().await;

    let (status, value) = send(&app, get_request("/json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        value["message"],
        "Hello, world from JSON serialization endpoint!"
    );
}

#[tokio::test]
async fn create_coerces_numeric_strings() {
    let (app, _dir) = test_app().await;

    let mut body = sample_product("widget");
    body["price"] = json!("9.99");
    body["stock"] = json!("3");

    let created = create(&app, body).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["price"].as_f64(), Some(9.99));
    assert_eq!(created["stock"].as_i64(), Some(3));

    // The stored row is numeric as well.
    let (status, fetched) = send(&app, get_request(&format!("/products/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["price"].as_f64(), Some(9.99));
    assert_eq!(fetched["stock"].as_i64(), Some(3));
}

#[tokio::test]
async fn create_accepts_form_bodies() {
    let (app, _dir) = test_app().await;

    let body = "name=Form+Widget&description=A+sample&brand=Acme&category=tools\
                &price=9.99&currency=EUR&stock=3&ean=4006381333931&color=red\
                &size=M&availability=in_stock&internal_id=SKU-002";

    let request = Request::builder()
        .method("POST")
        .uri("/products")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();

    let (status, value) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(value["name"], "Form Widget");
    assert_eq!(value["price"].as_f64(), Some(9.99));
    assert_eq!(value["stock"].as_i64(), Some(3));
}

#[tokio::test]
async fn create_rejects_unknown_content_type() {
    let (app, _dir) = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/products")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("name=x"))
        .unwrap();

    let (status, _value) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn get_missing_product_returns_404() {
    let (app, _dir) = test_app().await;

    let (status, value) = send(&app, get_request("/products/999999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value, json!({ "error": "Product not found" }));
}

#[tokio::test]
async fn list_pages_in_ascending_id_order() {
    let (app, _dir) = test_app().await;

    for name in ["a", "b", "c"] {
        create(&app, sample_product(name)).await;
    }

    let (status, value) = send(&app, get_request("/products?limit=2&offset=0")).await;
    assert_eq!(status, StatusCode::OK);
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items[0]["id"].as_i64() < items[1]["id"].as_i64());

    let (_, value) = send(&app, get_request("/products?limit=2&offset=2")).await;
    assert_eq!(value.as_array().unwrap().len(), 1);

    // Defaults: everything fits under the 100-row default page.
    let (_, value) = send(&app, get_request("/products")).await;
    assert_eq!(value.as_array().unwrap().len(), 3);

    // Unparseable paging values fall back to the defaults.
    let (status, value) = send(&app, get_request("/products?limit=lots&offset=nope")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn update_changes_only_present_fields() {
    let (app, _dir) = test_app().await;

    let created = create(&app, sample_product("widget")).await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        json_request("PUT", &format!("/products/{id}"), json!({ "stock": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["stock"].as_i64(), Some(42));
    assert_eq!(updated["name"], "widget");
    assert_eq!(updated["price"].as_f64(), Some(19.5));

    let (_, fetched) = send(&app, get_request(&format!("/products/{id}"))).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_missing_product_returns_404() {
    let (app, _dir) = test_app().await;

    let (status, value) = send(
        &app,
        json_request("PUT", "/products/999999", json!({ "stock": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value, json!({ "error": "Product not found" }));
}

#[tokio::test]
async fn delete_succeeds_once_then_404s() {
    let (app, _dir) = test_app().await;

    let created = create(&app, sample_product("widget")).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/products/{id}");

    let request = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    let (status, value) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({ "ok": true }));

    let request = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    let (status, value) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value, json!({ "error": "Product not found" }));
}

#[tokio::test]
async fn fortune_renders_escaped_html() {
    let (app, _dir) = test_app().await;

    create(&app, sample_product("Widget <script>alert(1)</script>")).await;

    let response = app.oneshot(get_request("/fortune")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Widget &lt;script&gt;"));
    assert!(!html.contains("<script>"));
}

#[tokio::test]
async fn security_headers_are_set() {
    let (app, _dir) = test_app().await;

    let response = app.oneshot(get_request("/json")).await.unwrap();

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");
    assert_eq!(response.headers()["referrer-policy"], "no-referrer");
}

#[tokio::test]
async fn health_reports_catalog_size() {
    let (app, _dir) = test_app().await;

    create(&app, sample_product("widget")).await;

    let (status, value) = send(&app, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "healthy");
    assert_eq!(value["products"].as_i64(), Some(1));
}
