//! End-to-end CRUD tests against a real Postgres instance.
//!
//! Run with `cargo test --features pg-tests` and a `DATABASE_URL` pointing at
//! a database the suite may write to. Migrations run on startup and every
//! test uses unique emails/SKUs, so the suite is safe to re-run.

#![cfg(feature = "pg-tests")]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use backlot_api::AppState;
use backlot_auth::JwtService;
use backlot_core::config::AppConfig;
use backlot_db::{Database, DatabaseConfig};
use backlot_models::{CreateUser, UserRole};
use backlot_services::AccountService;

struct TestApp {
    router: Router,
    token: String,
}

async fn spawn_app() -> TestApp {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for pg-tests");
    let db = Database::connect(&DatabaseConfig::with_url(&url))
        .await
        .expect("connect to test database");
    db.migrate().await.expect("run migrations");

    let mut config = AppConfig::default();
    config.database.url = url;
    config.auth.jwt_secret = "pg-test-secret".into();

    let jwt = JwtService::new(config.auth.jwt_secret.as_bytes(), config.auth.token_ttl_secs);
    let accounts = AccountService::new(db.pool().clone(), jwt.clone());
    let admin = accounts
        .create(CreateUser {
            email: unique_email("admin"),
            name: "Test Admin".into(),
            password: "correct horse battery".into(),
            role: UserRole::Admin,
            active: true,
        })
        .await
        .expect("create admin user");
    let token = jwt
        .issue(admin.id, &admin.email, admin.role)
        .expect("issue admin token");

    TestApp {
        router: backlot_api::api_router(AppState::new(db.pool().clone(), &config)),
        token,
    }
}

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@backlot.test", prefix, Uuid::new_v4().simple())
}

fn unique_sku() -> String {
    format!("SKU-{}", Uuid::new_v4().simple().to_string()[..12].to_uppercase())
}

impl TestApp {
    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));

        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }
}

#[tokio::test]
async fn login_and_me_roundtrip() {
    let app = spawn_app().await;
    let email = unique_email("login");

    let (status, _) = app
        .post(
            "/api/users",
            json!({ "email": email, "name": "Login Probe", "password": "a strong password", "role": "staff" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(
            "/api/auth/login",
            json!({ "email": email, "password": "a strong password" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["user"]["email"], email);

    let (status, body) = app
        .post(
            "/api/auth/login",
            json!({ "email": email, "password": "wrong password here" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "invalid email or password");

    let me = TestApp {
        router: app.router.clone(),
        token,
    };
    let (status, body) = me.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], email);
}

#[tokio::test]
async fn user_crud_roundtrip() {
    let app = spawn_app().await;
    let email = unique_email("crud");

    let (status, body) = app
        .post(
            "/api/users",
            json!({ "email": email, "name": "Crud User", "password": "a strong password", "role": "staff" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let id = body["data"]["id"].as_i64().unwrap();
    assert!(body["data"]["passwordHash"].is_null());

    let (status, body) = app.get(&format!("/api/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], email);

    let (status, body) = app
        .put(&format!("/api/users/{id}"), json!({ "name": "Renamed User" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Renamed User");

    let (status, body) = app.get(&format!("/api/users?search={email}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["id"], id);

    let (status, _) = app.delete(&format!("/api/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("/api/users/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let app = spawn_app().await;
    let email = unique_email("dup");
    let payload =
        json!({ "email": email, "name": "First", "password": "a strong password", "role": "staff" });

    let (status, _) = app.post("/api/users", payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post("/api/users", payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn supplier_and_product_crud() {
    let app = spawn_app().await;

    let (status, body) = app
        .post("/api/suppliers", json!({ "name": "Acme Wholesale" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let supplier_id = body["data"]["id"].as_i64().unwrap();

    let sku = unique_sku();
    let (status, body) = app
        .post(
            "/api/products",
            json!({
                "supplierId": supplier_id,
                "sku": sku,
                "name": "Widget",
                "priceCents": 1250,
                "stock": 40
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["priceCents"], 1250);

    // SKU is unique across products.
    let (status, body) = app
        .post(
            "/api/products",
            json!({ "sku": sku, "name": "Widget Clone", "priceCents": 900 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("sku"));

    let (status, body) = app
        .put(&format!("/api/products/{product_id}"), json!({ "priceCents": 1399 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["priceCents"], 1399);
    assert_eq!(body["data"]["name"], "Widget");

    let (status, _) = app.delete(&format!("/api/products/{product_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&format!("/api/suppliers/{supplier_id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_missing_resource_is_404() {
    let app = spawn_app().await;

    let (status, body) = app.delete("/api/contacts/999999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn campaign_contact_attachment_is_idempotent() {
    let app = spawn_app().await;

    let mut contact_ids = Vec::new();
    for name in ["Ada Lovelace", "Grace Hopper"] {
        let (status, body) = app
            .post(
                "/api/contacts",
                json!({ "name": name, "phone": "+15551234567" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        contact_ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let (status, body) = app
        .post("/api/campaigns", json!({ "name": "Spring Outreach" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let campaign_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], "draft");

    let (status, body) = app
        .post(
            &format!("/api/campaigns/{campaign_id}/contacts"),
            json!({ "contactIds": contact_ids }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Re-attaching the same contacts does not duplicate rows.
    let (status, body) = app
        .post(
            &format!("/api/campaigns/{campaign_id}/contacts"),
            json!({ "contactIds": contact_ids }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .delete(&format!(
            "/api/campaigns/{campaign_id}/contacts/{}",
            contact_ids[0]
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get(&format!("/api/campaigns/{campaign_id}/contacts"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["id"], contact_ids[1]);
}

#[tokio::test]
async fn collection_product_attachment() {
    let app = spawn_app().await;

    let (_, body) = app
        .post(
            "/api/products",
            json!({ "sku": unique_sku(), "name": "Bundled Widget", "priceCents": 500 }),
        )
        .await;
    let product_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post("/api/collections", json!({ "name": "Starter Kits" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let collection_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            &format!("/api/collections/{collection_id}/products"),
            json!({ "productIds": [product_id] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .delete(&format!(
            "/api/collections/{collection_id}/products/{product_id}"
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .get(&format!("/api/collections/{collection_id}/products"))
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn order_placement_totals_and_transitions() {
    let app = spawn_app().await;

    let (_, body) = app
        .post(
            "/api/customers",
            json!({ "name": "Bulk Buyer", "email": unique_email("buyer") }),
        )
        .await;
    let customer_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = app
        .post(
            "/api/products",
            json!({ "sku": unique_sku(), "name": "Crate of Widgets", "priceCents": 2000 }),
        )
        .await;
    let product_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            "/api/orders",
            json!({
                "customerId": customer_id,
                "items": [{ "productId": product_id, "quantity": 3 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["totalCents"], 6000);
    assert_eq!(body["data"]["items"][0]["unitPriceCents"], 2000);

    let (status, body) = app
        .put(&format!("/api/orders/{order_id}"), json!({ "status": "confirmed" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "confirmed");

    // Skipping straight to delivered is not allowed from confirmed.
    let (status, body) = app
        .put(&format!("/api/orders/{order_id}"), json!({ "status": "delivered" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("cannot transition"));
}

#[tokio::test]
async fn order_with_unknown_product_is_rejected() {
    let app = spawn_app().await;

    let (_, body) = app
        .post(
            "/api/customers",
            json!({ "name": "Hopeful Buyer", "email": unique_email("hopeful") }),
        )
        .await;
    let customer_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            "/api/orders",
            json!({
                "customerId": customer_id,
                "items": [{ "productId": 999999999, "quantity": 1 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["details"]["items[0].productId"].is_array());
}
