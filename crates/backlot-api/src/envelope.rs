//! The `{ success, data }` response envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use backlot_core::{PageMeta, Paginated};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

/// 200 with `{ success: true, data }`.
pub fn ok<T: Serialize>(data: T) -> Response {
    Json(Envelope { success: true, data, meta: None }).into_response()
}

/// 201 with `{ success: true, data }`.
pub fn created<T: Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(Envelope { success: true, data, meta: None }),
    )
        .into_response()
}

/// 200 with `{ success: true, data: [..], meta }`.
pub fn page<T: Serialize>(result: Paginated<T>) -> Response {
    let meta = result.meta();
    Json(Envelope {
        success: true,
        data: result.items,
        meta: Some(meta),
    })
    .into_response()
}

/// 200 with `{ success: true, data: null }`, returned by deletes.
pub fn deleted() -> Response {
    ok(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlot_core::PageParams;

    #[test]
    fn list_envelope_carries_meta() {
        let result = Paginated::new(vec![1, 2, 3], 7, PageParams { page: 1, per_page: 3 });
        let meta = result.meta();
        let body = serde_json::to_value(Envelope {
            success: true,
            data: result.items,
            meta: Some(meta),
        })
        .unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
        assert_eq!(body["meta"]["total"], 7);
        assert_eq!(body["meta"]["perPage"], 3);
        assert_eq!(body["meta"]["totalPages"], 3);
    }

    #[test]
    fn single_envelope_omits_meta() {
        let body = serde_json::to_value(Envelope { success: true, data: 1, meta: None }).unwrap();
        assert!(body.get("meta").is_none());
    }
}
