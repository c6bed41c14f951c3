//! User administration. Creating and deleting accounts, and changing role
//! or active flags, are admin-only; other edits are self-or-admin.

use axum::extract::{Path, State};
use axum::response::Response;
use backlot_core::Id;
use backlot_db::users::UserFilter;
use backlot_db::UserRepo;
use backlot_models::{CreateUser, UpdateUser};
use backlot_services::AccountService;

use crate::envelope;
use crate::error::ApiResult;
use crate::extractors::{AppState, CurrentUser, Filter, Page, Payload};

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Filter(filter): Filter<UserFilter>,
    Page(page): Page,
) -> ApiResult<Response> {
    let result = UserRepo::new(state.pool.clone()).list(&filter, page).await?;
    Ok(envelope::page(result))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    let row = UserRepo::new(state.pool.clone()).find(id).await?;
    Ok(envelope::ok(row))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(dto): Payload<CreateUser>,
) -> ApiResult<Response> {
    user.require_admin().map_err(crate::ApiError)?;

    let row = AccountService::new(state.pool.clone(), state.jwt.clone())
        .create(dto)
        .await?;
    Ok(envelope::created(row))
}

pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
    Payload(dto): Payload<UpdateUser>,
) -> ApiResult<Response> {
    if user.user_id != id || dto.role.is_some() || dto.active.is_some() {
        user.require_admin().map_err(crate::ApiError)?;
    }

    let row = AccountService::new(state.pool.clone(), state.jwt.clone())
        .update(id, dto)
        .await?;
    Ok(envelope::ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    user.require_admin().map_err(crate::ApiError)?;

    UserRepo::new(state.pool.clone()).delete(id).await?;
    Ok(envelope::deleted())
}
