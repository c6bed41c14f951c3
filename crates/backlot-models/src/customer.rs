//! Wholesale customers.

use backlot_core::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::patterns::PHONE_RE;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(email(message = "is not a valid email address"))]
    pub email: String,
    #[validate(regex(path = "PHONE_RE", message = "is not a valid phone number"))]
    pub phone: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub company: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomer {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "is not a valid email address"))]
    pub email: Option<String>,
    #[validate(regex(path = "PHONE_RE", message = "is not a valid phone number"))]
    pub phone: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub company: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub address: Option<String>,
}
