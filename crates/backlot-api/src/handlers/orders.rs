//! Order endpoints. Placement and status changes go through the service;
//! list and delete are repository pass-through.

use axum::extract::{Path, State};
use axum::response::Response;
use backlot_core::Id;
use backlot_db::orders::OrderFilter;
use backlot_db::OrderRepo;
use backlot_models::{CreateOrder, UpdateOrder};
use backlot_services::OrderService;

use crate::envelope;
use crate::error::ApiResult;
use crate::extractors::{AppState, CurrentUser, Filter, Page, Payload};

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Filter(filter): Filter<OrderFilter>,
    Page(page): Page,
) -> ApiResult<Response> {
    let result = OrderRepo::new(state.pool.clone()).list(&filter, page).await?;
    Ok(envelope::page(result))
}

/// GET /api/orders/:id: embeds line items.
pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    let row = OrderService::new(state.pool.clone()).find_with_items(id).await?;
    Ok(envelope::ok(row))
}

/// POST /api/orders: prices the items and stores order + items atomically.
pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Payload(dto): Payload<CreateOrder>,
) -> ApiResult<Response> {
    let row = OrderService::new(state.pool.clone()).place(dto).await?;
    Ok(envelope::created(row))
}

/// PUT /api/orders/:id: status transition and/or notes edit.
pub async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
    Payload(dto): Payload<UpdateOrder>,
) -> ApiResult<Response> {
    let row = OrderService::new(state.pool.clone()).update(id, dto).await?;
    Ok(envelope::ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    OrderRepo::new(state.pool.clone()).delete(id).await?;
    Ok(envelope::deleted())
}
