//! Route table for the `/api` surface.

use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::json;

use crate::extractors::AppState;
use crate::handlers::{
    assistants, auth, calls, campaigns, collections, contacts, customers, orders, phone_numbers,
    products, suppliers, users,
};

/// Build the `/api` router with the given state.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .route("/auth/login", axum::routing::post(auth::login))
        .route("/auth/me", get(auth::me))
        .nest("/users", users_router())
        .nest("/assistants", assistants_router())
        .nest("/contacts", contacts_router())
        .nest("/campaigns", campaigns_router())
        .nest("/phone-numbers", phone_numbers_router())
        .nest("/calls", calls_router())
        .nest("/suppliers", suppliers_router())
        .nest("/products", products_router())
        .nest("/collections", collections_router())
        .nest("/customers", customers_router())
        .nest("/orders", orders_router())
}

fn users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/:id", get(users::get).put(users::update).delete(users::delete))
}

fn assistants_router() -> Router<AppState> {
    Router::new()
        .route("/", get(assistants::list).post(assistants::create))
        .route(
            "/:id",
            get(assistants::get).put(assistants::update).delete(assistants::delete),
        )
}

fn contacts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(contacts::list).post(contacts::create))
        .route(
            "/:id",
            get(contacts::get).put(contacts::update).delete(contacts::delete),
        )
}

fn campaigns_router() -> Router<AppState> {
    Router::new()
        .route("/", get(campaigns::list).post(campaigns::create))
        .route(
            "/:id",
            get(campaigns::get).put(campaigns::update).delete(campaigns::delete),
        )
        .route(
            "/:id/contacts",
            get(campaigns::contacts).post(campaigns::attach_contacts),
        )
        .route("/:id/contacts/:contact_id", delete(campaigns::detach_contact))
}

fn phone_numbers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(phone_numbers::list).post(phone_numbers::create))
        .route(
            "/:id",
            get(phone_numbers::get)
                .put(phone_numbers::update)
                .delete(phone_numbers::delete),
        )
}

fn calls_router() -> Router<AppState> {
    Router::new()
        .route("/", get(calls::list).post(calls::create))
        .route("/:id", get(calls::get).put(calls::update).delete(calls::delete))
}

fn suppliers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(suppliers::list).post(suppliers::create))
        .route(
            "/:id",
            get(suppliers::get).put(suppliers::update).delete(suppliers::delete),
        )
}

fn products_router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/:id",
            get(products::get).put(products::update).delete(products::delete),
        )
}

fn collections_router() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::list).post(collections::create))
        .route(
            "/:id",
            get(collections::get)
                .put(collections::update)
                .delete(collections::delete),
        )
        .route(
            "/:id/products",
            get(collections::products).post(collections::attach_products),
        )
        .route("/:id/products/:product_id", delete(collections::detach_product))
}

fn customers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::list).post(customers::create))
        .route(
            "/:id",
            get(customers::get).put(customers::update).delete(customers::delete),
        )
}

fn orders_router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/:id", get(orders::get).put(orders::update).delete(orders::delete))
}

/// GET /api: resource directory (public).
async fn api_root() -> Json<serde_json::Value> {
    Json(json!({
        "name": "backlot",
        "version": env!("CARGO_PKG_VERSION"),
        "resources": {
            "auth": "/api/auth/login",
            "users": "/api/users",
            "assistants": "/api/assistants",
            "contacts": "/api/contacts",
            "campaigns": "/api/campaigns",
            "phoneNumbers": "/api/phone-numbers",
            "calls": "/api/calls",
            "suppliers": "/api/suppliers",
            "products": "/api/products",
            "collections": "/api/collections",
            "customers": "/api/customers",
            "orders": "/api/orders"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use backlot_auth::JwtService;
    use backlot_models::UserRole;
    use tower::ServiceExt;

    // connect_lazy never touches the network; these tests only exercise
    // paths that fail before any query runs.
    fn test_state(require_authentication: bool) -> AppState {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/backlot_test")
            .expect("lazy pool");

        AppState {
            pool,
            jwt: JwtService::new(b"test-secret", 3600),
            require_authentication,
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn api_root_lists_resources_without_auth() {
        let app = api_router(test_state(true));

        let response = app
            .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["resources"]["orders"], "/api/orders");
    }

    #[tokio::test]
    async fn missing_token_is_401_with_envelope() {
        let app = api_router(test_state(true));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/assistants")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "authentication required");
    }

    #[tokio::test]
    async fn garbled_token_is_401_even_with_auth_disabled() {
        let app = api_router(test_state(false));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/assistants")
                    .header("authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_payload_is_422_with_field_details() {
        let app = api_router(test_state(false));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/contacts")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"name":"","phone":"bad","email":"nope"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["details"]["name"][0].is_string());
        assert!(body["details"]["phone"][0].is_string());
    }

    #[tokio::test]
    async fn unknown_status_string_is_422_with_field_details() {
        let app = api_router(test_state(false));

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/orders/1")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"status":"archived"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["details"]["status"][0]
            .as_str()
            .unwrap()
            .contains("unknown variant"));
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let app = api_router(test_state(false));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/suppliers")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn staff_token_cannot_create_users() {
        let state = test_state(true);
        let token = state.jwt.issue(7, "staff@example.com", UserRole::Staff).unwrap();
        let app = api_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/users")
                    .header("authorization", format!("Bearer {}", token))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"email":"new@example.com","name":"New","password":"longenough","role":"staff"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["error"], "admin role required");
    }

    #[tokio::test]
    async fn empty_order_items_fail_validation_before_any_query() {
        let app = api_router(test_state(false));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/orders")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"customerId":1,"items":[]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["details"]["items"][0], "must contain at least one item");
    }
}
