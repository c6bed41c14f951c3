//! Phone lines answered by assistants.
//!
//! Plain CRUD records with an optional assistant assignment; no telephony
//! integration sits behind them.

use backlot_core::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::patterns::PHONE_RE;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    pub id: Id,
    pub number: String,
    pub label: Option<String>,
    pub provider: Option<String>,
    /// The assistant answering this line, if any.
    pub assistant_id: Option<Id>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhoneNumber {
    #[validate(regex(path = "PHONE_RE", message = "is not a valid phone number"))]
    pub number: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub label: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub provider: Option<String>,
    pub assistant_id: Option<Id>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhoneNumber {
    #[validate(regex(path = "PHONE_RE", message = "is not a valid phone number"))]
    pub number: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub label: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub provider: Option<String>,
    pub assistant_id: Option<Id>,
    pub active: Option<bool>,
}
