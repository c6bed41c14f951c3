//! Assistant CRUD: repository pass-through.

use axum::extract::{Path, State};
use axum::response::Response;
use backlot_core::Id;
use backlot_db::assistants::AssistantFilter;
use backlot_db::AssistantRepo;
use backlot_models::{CreateAssistant, UpdateAssistant};

use crate::envelope;
use crate::error::ApiResult;
use crate::extractors::{AppState, CurrentUser, Filter, Page, Payload};

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Filter(filter): Filter<AssistantFilter>,
    Page(page): Page,
) -> ApiResult<Response> {
    let result = AssistantRepo::new(state.pool.clone()).list(&filter, page).await?;
    Ok(envelope::page(result))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    let row = AssistantRepo::new(state.pool.clone()).find(id).await?;
    Ok(envelope::ok(row))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(dto): Payload<CreateAssistant>,
) -> ApiResult<Response> {
    let row = AssistantRepo::new(state.pool.clone())
        .create(user.user_id, dto)
        .await?;
    Ok(envelope::created(row))
}

pub async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
    Payload(dto): Payload<UpdateAssistant>,
) -> ApiResult<Response> {
    let row = AssistantRepo::new(state.pool.clone()).update(id, dto).await?;
    Ok(envelope::ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    AssistantRepo::new(state.pool.clone()).delete(id).await?;
    Ok(envelope::deleted())
}
