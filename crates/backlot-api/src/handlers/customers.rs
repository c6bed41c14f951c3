//! Customer CRUD: repository pass-through.

use axum::extract::{Path, State};
use axum::response::Response;
use backlot_core::Id;
use backlot_db::customers::CustomerFilter;
use backlot_db::CustomerRepo;
use backlot_models::{CreateCustomer, UpdateCustomer};

use crate::envelope;
use crate::error::ApiResult;
use crate::extractors::{AppState, CurrentUser, Filter, Page, Payload};

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Filter(filter): Filter<CustomerFilter>,
    Page(page): Page,
) -> ApiResult<Response> {
    let result = CustomerRepo::new(state.pool.clone()).list(&filter, page).await?;
    Ok(envelope::page(result))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    let row = CustomerRepo::new(state.pool.clone()).find(id).await?;
    Ok(envelope::ok(row))
}

pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Payload(dto): Payload<CreateCustomer>,
) -> ApiResult<Response> {
    let row = CustomerRepo::new(state.pool.clone()).create(dto).await?;
    Ok(envelope::created(row))
}

pub async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
    Payload(dto): Payload<UpdateCustomer>,
) -> ApiResult<Response> {
    let row = CustomerRepo::new(state.pool.clone()).update(id, dto).await?;
    Ok(envelope::ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    CustomerRepo::new(state.pool.clone()).delete(id).await?;
    Ok(envelope::deleted())
}
