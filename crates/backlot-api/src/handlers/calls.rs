//! Call CRUD. Responses embed the display label for the stored status.

use axum::extract::{Path, State};
use axum::response::Response;
use backlot_core::Id;
use backlot_db::calls::CallFilter;
use backlot_db::CallRepo;
use backlot_models::{Call, CreateCall, UpdateCall};
use serde::Serialize;

use crate::envelope;
use crate::error::ApiResult;
use crate::extractors::{AppState, CurrentUser, Filter, Page, Payload};

/// A call as serialized to the console, with the human-readable status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CallView {
    #[serde(flatten)]
    call: Call,
    status_label: &'static str,
}

fn view(call: Call) -> CallView {
    CallView {
        status_label: call.status.label(),
        call,
    }
}

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Filter(filter): Filter<CallFilter>,
    Page(page): Page,
) -> ApiResult<Response> {
    let result = CallRepo::new(state.pool.clone()).list(&filter, page).await?;
    Ok(envelope::page(result.map(view)))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    let row = CallRepo::new(state.pool.clone()).find(id).await?;
    Ok(envelope::ok(view(row)))
}

pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Payload(dto): Payload<CreateCall>,
) -> ApiResult<Response> {
    let row = CallRepo::new(state.pool.clone()).create(dto).await?;
    Ok(envelope::created(view(row)))
}

pub async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
    Payload(dto): Payload<UpdateCall>,
) -> ApiResult<Response> {
    let row = CallRepo::new(state.pool.clone()).update(id, dto).await?;
    Ok(envelope::ok(view(row)))
}

pub async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    CallRepo::new(state.pool.clone()).delete(id).await?;
    Ok(envelope::deleted())
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlot_models::CallStatus;
    use chrono::Utc;

    #[test]
    fn view_flattens_call_and_adds_label() {
        let call = Call {
            id: 1,
            assistant_id: 2,
            contact_id: None,
            phone_number_id: None,
            status: CallStatus::InProgress,
            started_at: None,
            ended_at: None,
            duration_secs: None,
            transcript: None,
            recording_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let body = serde_json::to_value(view(call)).unwrap();
        assert_eq!(body["status"], "in_progress");
        assert_eq!(body["statusLabel"], "In Progress");
        assert_eq!(body["assistantId"], 2);
    }
}
