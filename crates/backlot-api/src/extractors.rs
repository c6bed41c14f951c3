//! Shared state and request extractors.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use backlot_auth::{JwtService, Principal};
use backlot_core::{AppConfig, PageParams};
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use validator::Validate;

use crate::error::ApiError;

/// Router state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub jwt: JwtService,
    pub require_authentication: bool,
}

impl AppState {
    pub fn new(pool: PgPool, config: &AppConfig) -> Self {
        Self {
            pool,
            jwt: JwtService::new(
                config.auth.jwt_secret.as_bytes(),
                config.auth.token_ttl_secs,
            ),
            require_authentication: config.auth.require_authentication,
        }
    }
}

/// Bearer-token principal. With `require_authentication` off, requests
/// without credentials run as an anonymous staff principal instead.
pub struct CurrentUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok());

        match header.and_then(|value| value.strip_prefix("Bearer ")) {
            Some(token) => {
                let claims = app_state
                    .jwt
                    .verify(token)
                    .map_err(|e| ApiError::unauthorized(e.to_string()))?;
                Ok(CurrentUser(Principal::try_from(claims).map_err(ApiError)?))
            }
            None if !app_state.require_authentication => {
                Ok(CurrentUser(Principal::anonymous()))
            }
            None => Err(ApiError::unauthorized("authentication required")),
        }
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// `page`/`perPage` query parameters, normalized.
pub struct Page(pub PageParams);

#[async_trait]
impl<S> FromRequestParts<S> for Page
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        Ok(Page(params.normalized()))
    }
}

/// Per-entity filter parameters, deserialized from the query string.
pub struct Filter<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Filter<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(filter) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        Ok(Filter(filter))
    }
}

/// JSON request body, validated before the handler sees it. Malformed JSON
/// is a 400; rule failures and out-of-domain field values (an unknown enum
/// string, a wrong type) are a 422 with field details.
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(payload) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| match rejection {
                JsonRejection::JsonDataError(e) => data_error_to_validation(e.body_text()),
                other => ApiError::bad_request(other.body_text()),
            })?;

        backlot_models::validate(&payload).map_err(backlot_core::AppError::Validation)?;
        Ok(Payload(payload))
    }
}

/// A body that parsed as JSON but does not fit the target type. axum reports
/// these through serde_path_to_error, so the rejection text carries the field
/// path ("status: unknown variant `x` ..."); key the 422 details by it.
fn data_error_to_validation(detail: String) -> ApiError {
    let message = detail
        .strip_prefix("Failed to deserialize the JSON body into the target type: ")
        .unwrap_or(&detail);
    let message = message
        .rfind(" at line ")
        .map_or(message, |at| &message[..at]);

    let mut errors = backlot_core::ValidationErrors::new();
    match message.split_once(": ") {
        Some((path, rest)) if !path.contains(' ') => errors.add(path, rest),
        _ => errors.add("body", message),
    }
    ApiError(backlot_core::AppError::Validation(errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlot_core::AppError;

    #[test]
    fn data_error_is_keyed_by_field_path() {
        let err = data_error_to_validation(
            "Failed to deserialize the JSON body into the target type: \
             status: unknown variant `archived`, expected one of `pending`, \
             `confirmed` at line 1 column 21"
                .to_string(),
        );

        match err.0 {
            AppError::Validation(errors) => {
                let messages = &errors.errors["status"];
                assert!(messages[0].starts_with("unknown variant `archived`"));
                assert!(!messages[0].contains("at line"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn pathless_data_error_falls_back_to_body() {
        let err = data_error_to_validation(
            "Failed to deserialize the JSON body into the target type: \
             invalid type: string \"x\", expected struct CreateOrder at line 1 column 3"
                .to_string(),
        );

        match err.0 {
            AppError::Validation(errors) => assert!(errors.has_error("body")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
