//! Backlot HTTP server
//!
//! Wires configuration, the Postgres pool, and the API router behind
//! tower-http middleware with graceful shutdown.

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backlot_api::AppState;
use backlot_core::config::AppConfig;
use backlot_db::{Database, DatabaseConfig};

mod health;
mod metrics;

use health::HealthState;
use metrics::Metrics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        AppConfig::default()
    });

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "Starting Backlot"
    );

    let db_config = DatabaseConfig::from(&config.database);
    let db = match Database::connect(&db_config).await {
        Ok(db) => {
            info!("Connected to database");
            if let Err(e) = db.migrate().await {
                tracing::warn!("Migration failed: {}", e);
            }
            Some(db)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to connect to database: {}. API calls will fail until it is reachable.",
                e
            );
            None
        }
    };

    // API handlers open connections on demand, so a lazy pool keeps the
    // server bootable while Postgres is still coming up.
    let pool = match &db {
        Some(db) => db.pool().clone(),
        None => sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect_lazy(&config.database.url)?,
    };

    let metrics = Arc::new(Metrics::new());
    let health_state = Arc::new(HealthState { db });
    let api_state = AppState::new(pool, &config);

    let app = build_router(api_state, health_state, metrics);

    let addr = config.server_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,backlot_server=debug,backlot_api=debug,tower_http=debug".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Assemble health, metrics, and API routers behind shared middleware.
fn build_router(
    api_state: AppState,
    health_state: Arc<HealthState>,
    metrics: Arc<Metrics>,
) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_ok))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(health_state);

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/metrics.json", get(metrics::json_metrics))
        .with_state(metrics.clone());

    Router::new()
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(backlot_api::api_router(api_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .layer(middleware::from_fn_with_state(
            metrics,
            metrics::metrics_middleware,
        ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = AppConfig::default();
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();

        build_router(
            AppState::new(pool, &config),
            Arc::new(HealthState { db: None }),
            Arc::new(Metrics::new()),
        )
    }

    #[tokio::test]
    async fn health_endpoint_is_ok() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_without_database_is_unavailable() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn api_root_lists_collections() {
        let app = test_app();

        let response = app
            .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_is_ok() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
