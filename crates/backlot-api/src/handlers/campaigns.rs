//! Campaign CRUD plus the contact association sub-resource.

use axum::extract::{Path, State};
use axum::response::Response;
use backlot_core::Id;
use backlot_db::campaigns::CampaignFilter;
use backlot_db::CampaignRepo;
use backlot_models::{AttachContacts, CreateCampaign, UpdateCampaign};
use backlot_services::CampaignService;

use crate::envelope;
use crate::error::ApiResult;
use crate::extractors::{AppState, CurrentUser, Filter, Page, Payload};

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Filter(filter): Filter<CampaignFilter>,
    Page(page): Page,
) -> ApiResult<Response> {
    let result = CampaignRepo::new(state.pool.clone()).list(&filter, page).await?;
    Ok(envelope::page(result))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    let row = CampaignRepo::new(state.pool.clone()).find(id).await?;
    Ok(envelope::ok(row))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(dto): Payload<CreateCampaign>,
) -> ApiResult<Response> {
    let row = CampaignRepo::new(state.pool.clone())
        .create(user.user_id, dto)
        .await?;
    Ok(envelope::created(row))
}

pub async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
    Payload(dto): Payload<UpdateCampaign>,
) -> ApiResult<Response> {
    let row = CampaignRepo::new(state.pool.clone()).update(id, dto).await?;
    Ok(envelope::ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    CampaignRepo::new(state.pool.clone()).delete(id).await?;
    Ok(envelope::deleted())
}

/// GET /api/campaigns/:id/contacts.
pub async fn contacts(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    let rows = CampaignService::new(state.pool.clone()).contacts(id).await?;
    Ok(envelope::ok(rows))
}

/// POST /api/campaigns/:id/contacts: idempotent attach.
pub async fn attach_contacts(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
    Payload(dto): Payload<AttachContacts>,
) -> ApiResult<Response> {
    let rows = CampaignService::new(state.pool.clone())
        .attach(id, &dto.contact_ids)
        .await?;
    Ok(envelope::ok(rows))
}

/// DELETE /api/campaigns/:id/contacts/:contact_id.
pub async fn detach_contact(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path((id, contact_id)): Path<(Id, Id)>,
) -> ApiResult<Response> {
    CampaignService::new(state.pool.clone())
        .detach(id, contact_id)
        .await?;
    Ok(envelope::deleted())
}
