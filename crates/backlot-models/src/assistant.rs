//! AI assistants managed through the console.

use backlot_core::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    pub id: Id,
    pub user_id: Id,
    pub name: String,
    pub description: Option<String>,
    /// LLM identifier, e.g. "gpt-4o" or "claude-3-5-sonnet".
    pub model: String,
    pub voice: String,
    pub first_message: String,
    pub system_prompt: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssistant {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub model: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub voice: String,
    #[validate(length(min = 1, max = 1000, message = "must be between 1 and 1000 characters"))]
    pub first_message: String,
    #[validate(length(min = 1, max = 10000, message = "must be between 1 and 10000 characters"))]
    pub system_prompt: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssistant {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub model: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub voice: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "must be between 1 and 1000 characters"))]
    pub first_message: Option<String>,
    #[validate(length(min = 1, max = 10000, message = "must be between 1 and 10000 characters"))]
    pub system_prompt: Option<String>,
    pub active: Option<bool>,
}
