//! Phone number CRUD: repository pass-through.

use axum::extract::{Path, State};
use axum::response::Response;
use backlot_core::Id;
use backlot_db::phone_numbers::PhoneNumberFilter;
use backlot_db::PhoneNumberRepo;
use backlot_models::{CreatePhoneNumber, UpdatePhoneNumber};

use crate::envelope;
use crate::error::ApiResult;
use crate::extractors::{AppState, CurrentUser, Filter, Page, Payload};

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Filter(filter): Filter<PhoneNumberFilter>,
    Page(page): Page,
) -> ApiResult<Response> {
    let result = PhoneNumberRepo::new(state.pool.clone()).list(&filter, page).await?;
    Ok(envelope::page(result))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    let row = PhoneNumberRepo::new(state.pool.clone()).find(id).await?;
    Ok(envelope::ok(row))
}

pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Payload(dto): Payload<CreatePhoneNumber>,
) -> ApiResult<Response> {
    let row = PhoneNumberRepo::new(state.pool.clone()).create(dto).await?;
    Ok(envelope::created(row))
}

pub async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
    Payload(dto): Payload<UpdatePhoneNumber>,
) -> ApiResult<Response> {
    let row = PhoneNumberRepo::new(state.pool.clone()).update(id, dto).await?;
    Ok(envelope::ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    PhoneNumberRepo::new(state.pool.clone()).delete(id).await?;
    Ok(envelope::deleted())
}
