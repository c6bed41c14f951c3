//! API error responses.
//!
//! One `IntoResponse` impl replaces the per-handler try/catch blocks the
//! consoles grew in their previous life: repositories and services raise
//! `AppError`, and this module turns it into the right HTTP status plus the
//! `{ success: false, error }` envelope.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use backlot_core::AppError;
use backlot_db::RepoError;
use serde::Serialize;

#[derive(Debug)]
pub struct ApiError(pub AppError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        ApiError(err.into())
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError(AppError::BadRequest(message.into()))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError(AppError::unauthorized(message))
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<HashMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let (error, details) = match self.0 {
            // Server-side detail is logged where it happened, never echoed.
            AppError::Database(_) | AppError::Internal(_) | AppError::Config(_) => {
                ("internal server error".to_string(), None)
            }
            AppError::Validation(errors) => {
                (errors.full_messages().join(", "), Some(errors.errors))
            }
            other => (other.to_string(), None),
        };

        (
            status,
            Json(ErrorEnvelope { success: false, error, details }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlot_core::ValidationErrors;

    #[tokio::test]
    async fn not_found_maps_to_404_with_envelope() {
        let response = ApiError(AppError::not_found("Order", 12)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Order with id 12 not found");
    }

    #[tokio::test]
    async fn validation_maps_to_422_with_details() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "must not be empty");

        let response = ApiError(AppError::Validation(errors)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["details"]["name"][0], "must not be empty");
    }

    #[tokio::test]
    async fn database_detail_is_not_echoed() {
        let response = ApiError(AppError::Database("password for bob".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "internal server error");
    }

    #[tokio::test]
    async fn unique_violation_maps_to_409() {
        let response =
            ApiError(AppError::UniqueViolation { field: "email".into() }).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
