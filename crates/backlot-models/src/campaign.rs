//! Calling campaigns and their contact association.

use backlot_core::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "campaign_status", rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Active,
    Paused,
    Completed,
}

impl Default for CampaignStatus {
    fn default() -> Self {
        CampaignStatus::Draft
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Id,
    pub user_id: Id,
    pub name: String,
    pub description: Option<String>,
    pub status: CampaignStatus,
    pub assistant_id: Option<Id>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaign {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub status: CampaignStatus,
    pub assistant_id: Option<Id>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaign {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    pub status: Option<CampaignStatus>,
    pub assistant_id: Option<Id>,
}

/// Body for `POST /api/campaigns/:id/contacts`. The attach is idempotent;
/// contacts already on the campaign are skipped.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttachContacts {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub contact_ids: Vec<Id>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&CampaignStatus::Scheduled).unwrap(),
            "\"scheduled\""
        );
        let parsed: CampaignStatus = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(parsed, CampaignStatus::Paused);
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert!(serde_json::from_str::<CampaignStatus>("\"archived\"").is_err());
    }
}
