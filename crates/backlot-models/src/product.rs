//! Wholesale products. Money is kept in integer cents.

use backlot_core::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::patterns::SKU_RE;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Id,
    pub supplier_id: Option<Id>,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub supplier_id: Option<Id>,
    #[validate(regex(path = "SKU_RE", message = "must be uppercase alphanumerics and dashes"))]
    pub sku: String,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price_cents: i64,
    #[validate(range(min = 0, message = "must not be negative"))]
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub supplier_id: Option<Id>,
    #[validate(regex(path = "SKU_RE", message = "must be uppercase alphanumerics and dashes"))]
    pub sku: Option<String>,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price_cents: Option<i64>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock: Option<i32>,
    pub active: Option<bool>,
}
