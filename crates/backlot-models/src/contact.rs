//! Contacts reachable by campaigns and calls.

use backlot_core::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::patterns::PHONE_RE;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Id,
    pub user_id: Id,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContact {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(regex(path = "PHONE_RE", message = "is not a valid phone number"))]
    pub phone: String,
    #[validate(email(message = "is not a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContact {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(regex(path = "PHONE_RE", message = "is not a valid phone number"))]
    pub phone: Option<String>,
    #[validate(email(message = "is not a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub notes: Option<String>,
}
