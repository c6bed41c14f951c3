//! Wholesale suppliers.

use backlot_core::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::patterns::PHONE_RE;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Id,
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub lead_time_days: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplier {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub contact_name: Option<String>,
    #[validate(email(message = "is not a valid email address"))]
    pub email: Option<String>,
    #[validate(regex(path = "PHONE_RE", message = "is not a valid phone number"))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub address: Option<String>,
    #[validate(range(min = 0, max = 365, message = "must be between 0 and 365"))]
    pub lead_time_days: Option<i32>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplier {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub contact_name: Option<String>,
    #[validate(email(message = "is not a valid email address"))]
    pub email: Option<String>,
    #[validate(regex(path = "PHONE_RE", message = "is not a valid phone number"))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub address: Option<String>,
    #[validate(range(min = 0, max = 365, message = "must be between 0 and 365"))]
    pub lead_time_days: Option<i32>,
    pub active: Option<bool>,
}
