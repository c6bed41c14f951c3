//! Login and current-user endpoints.

use axum::extract::State;
use axum::response::Response;
use backlot_auth::JwtService;
use backlot_db::UserRepo;
use backlot_models::LoginRequest;
use backlot_services::AccountService;
use serde_json::json;

use crate::envelope;
use crate::error::ApiResult;
use crate::extractors::{AppState, CurrentUser, Payload};

fn accounts(pool: sqlx::PgPool, jwt: JwtService) -> AccountService {
    AccountService::new(pool, jwt)
}

/// POST /api/auth/login (public).
pub async fn login(
    State(state): State<AppState>,
    Payload(dto): Payload<LoginRequest>,
) -> ApiResult<Response> {
    let (token, user) = accounts(state.pool.clone(), state.jwt.clone())
        .login(&dto.email, &dto.password)
        .await?;

    Ok(envelope::ok(json!({ "token": token, "user": user })))
}

/// GET /api/auth/me.
pub async fn me(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Response> {
    if user.anonymous {
        return Ok(envelope::ok(json!({
            "id": user.user_id,
            "email": user.email,
            "role": user.role,
            "anonymous": true,
        })));
    }

    let row = UserRepo::new(state.pool.clone()).find(user.user_id).await?;
    Ok(envelope::ok(row))
}
