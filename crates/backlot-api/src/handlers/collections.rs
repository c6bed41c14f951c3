//! Collection CRUD plus the product association sub-resource.

use axum::extract::{Path, State};
use axum::response::Response;
use backlot_core::Id;
use backlot_db::collections::CollectionFilter;
use backlot_db::CollectionRepo;
use backlot_models::{AttachProducts, CreateCollection, UpdateCollection};

use crate::envelope;
use crate::error::ApiResult;
use crate::extractors::{AppState, CurrentUser, Filter, Page, Payload};

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Filter(filter): Filter<CollectionFilter>,
    Page(page): Page,
) -> ApiResult<Response> {
    let result = CollectionRepo::new(state.pool.clone()).list(&filter, page).await?;
    Ok(envelope::page(result))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    let row = CollectionRepo::new(state.pool.clone()).find(id).await?;
    Ok(envelope::ok(row))
}

pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Payload(dto): Payload<CreateCollection>,
) -> ApiResult<Response> {
    let row = CollectionRepo::new(state.pool.clone()).create(dto).await?;
    Ok(envelope::created(row))
}

pub async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
    Payload(dto): Payload<UpdateCollection>,
) -> ApiResult<Response> {
    let row = CollectionRepo::new(state.pool.clone()).update(id, dto).await?;
    Ok(envelope::ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    CollectionRepo::new(state.pool.clone()).delete(id).await?;
    Ok(envelope::deleted())
}

/// GET /api/collections/:id/products.
pub async fn products(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    let repo = CollectionRepo::new(state.pool.clone());
    repo.find(id).await?;
    let rows = repo.products(id).await?;
    Ok(envelope::ok(rows))
}

/// POST /api/collections/:id/products: idempotent attach.
pub async fn attach_products(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
    Payload(dto): Payload<AttachProducts>,
) -> ApiResult<Response> {
    let repo = CollectionRepo::new(state.pool.clone());
    repo.find(id).await?;
    repo.attach_products(id, &dto.product_ids).await?;
    let rows = repo.products(id).await?;
    Ok(envelope::ok(rows))
}

/// DELETE /api/collections/:id/products/:product_id.
pub async fn detach_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path((id, product_id)): Path<(Id, Id)>,
) -> ApiResult<Response> {
    let repo = CollectionRepo::new(state.pool.clone());
    repo.find(id).await?;
    repo.detach_product(id, product_id).await?;
    Ok(envelope::deleted())
}
