//! Health endpoints: a plain liveness probe and a readiness report that
//! pings Postgres.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use backlot_db::Database;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: &'static str,
    pub components: Vec<ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    fn http_status(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// State behind the health routes. `db` is `None` when the server came up
/// without a reachable database.
#[derive(Clone)]
pub struct HealthState {
    pub db: Option<Database>,
}

/// GET /health: plain-text probe for load balancers.
pub async fn health_ok() -> &'static str {
    "OK"
}

/// GET /health/live: the process is up and serving.
pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// GET /health/ready: pings Postgres; 503 when the database is gone.
pub async fn readiness(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let started = Instant::now();
    let database = match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => ComponentHealth {
                name: "postgres",
                status: HealthStatus::Healthy,
                message: None,
                response_time_ms: started.elapsed().as_millis() as u64,
            },
            Err(e) => ComponentHealth {
                name: "postgres",
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
                response_time_ms: started.elapsed().as_millis() as u64,
            },
        },
        None => ComponentHealth {
            name: "postgres",
            status: HealthStatus::Unhealthy,
            message: Some("not connected".into()),
            response_time_ms: 0,
        },
    };

    let report = HealthReport {
        status: database.status,
        version: env!("CARGO_PKG_VERSION"),
        components: vec![database],
        timestamp: chrono::Utc::now(),
    };

    (report.http_status(), Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn readiness_without_database_is_503() {
        let state = Arc::new(HealthState { db: None });
        let response = readiness(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn liveness_is_healthy() {
        let Json(body) = liveness().await;
        assert_eq!(body["status"], "healthy");
    }
}
