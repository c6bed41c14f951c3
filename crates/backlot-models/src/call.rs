//! Call records and the status display mapping.

use backlot_core::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Lifecycle of a call, as stored. The console renders the display label
/// from [`CallStatus::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "call_status", rename_all = "snake_case")]
pub enum CallStatus {
    Queued,
    Ringing,
    InProgress,
    Completed,
    Failed,
    Busy,
    NoAnswer,
    Canceled,
}

impl CallStatus {
    /// Human-readable label shown in the console.
    pub fn label(&self) -> &'static str {
        match self {
            CallStatus::Queued => "Queued",
            CallStatus::Ringing => "Ringing",
            CallStatus::InProgress => "In Progress",
            CallStatus::Completed => "Completed",
            CallStatus::Failed => "Failed",
            CallStatus::Busy => "Busy",
            CallStatus::NoAnswer => "No Answer",
            CallStatus::Canceled => "Canceled",
        }
    }

    /// A terminal call never changes status again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CallStatus::Completed
                | CallStatus::Failed
                | CallStatus::Busy
                | CallStatus::NoAnswer
                | CallStatus::Canceled
        )
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: Id,
    pub assistant_id: Id,
    pub contact_id: Option<Id>,
    pub phone_number_id: Option<Id>,
    pub status: CallStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_secs: Option<i32>,
    pub transcript: Option<String>,
    pub recording_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCall {
    pub assistant_id: Id,
    pub contact_id: Option<Id>,
    pub phone_number_id: Option<Id>,
    #[serde(default = "default_status")]
    pub status: CallStatus,
    pub started_at: Option<DateTime<Utc>>,
}

fn default_status() -> CallStatus {
    CallStatus::Queued
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCall {
    pub status: Option<CallStatus>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub duration_secs: Option<i32>,
    pub transcript: Option<String>,
    #[validate(url(message = "is not a valid URL"))]
    pub recording_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_the_console_display_table() {
        assert_eq!(CallStatus::InProgress.label(), "In Progress");
        assert_eq!(CallStatus::NoAnswer.label(), "No Answer");
        assert_eq!(CallStatus::Queued.label(), "Queued");
    }

    #[test]
    fn serde_round_trips_snake_case() {
        assert_eq!(
            serde_json::to_string(&CallStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: CallStatus = serde_json::from_str("\"no_answer\"").unwrap();
        assert_eq!(parsed, CallStatus::NoAnswer);
    }

    #[test]
    fn terminal_states_are_final() {
        assert!(!CallStatus::Queued.is_terminal());
        assert!(!CallStatus::Ringing.is_terminal());
        assert!(!CallStatus::InProgress.is_terminal());
        assert!(CallStatus::Completed.is_terminal());
        assert!(CallStatus::Busy.is_terminal());
        assert!(CallStatus::Canceled.is_terminal());
    }
}
