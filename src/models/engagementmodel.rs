use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "engagement_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EngagementState {
    Contacted,
    Confirmed,
    InProgress,
    Finalized,
    Cancelled,
}

impl EngagementState {
    pub fn to_str(&self) -> &str {
        match self {
            EngagementState::Contacted => "contacted",
            EngagementState::Confirmed => "confirmed",
            EngagementState::InProgress => "in_progress",
            EngagementState::Finalized => "finalized",
            EngagementState::Cancelled => "cancelled",
        }
    }

    /// Active engagements are the ones a provider still has work open on.
    pub fn is_active(&self) -> bool {
        matches!(self, EngagementState::Confirmed | EngagementState::InProgress)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EngagementState::Finalized | EngagementState::Cancelled)
    }
}

/// One client↔provider contracting instance. Rows are never hard-deleted;
/// state only moves through the lifecycle transitions.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Engagement {
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub listing_id: Option<Uuid>,
    pub agreement_confirmed: bool,
    pub state: EngagementState,
    pub contacted_at: DateTime<Utc>,
    pub agreement_confirmed_at: Option<DateTime<Utc>>,
    pub finalized_at: Option<DateTime<Utc>>,
    pub client_confirmed_finalized: bool,
    pub client_confirmed_finalized_at: Option<DateTime<Utc>>,
}

/// Client-side projection row: the engagement plus whether the client has
/// already left a review (and which general score they gave).
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClientEngagement {
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub listing_id: Option<Uuid>,
    pub agreement_confirmed: bool,
    pub state: EngagementState,
    pub contacted_at: DateTime<Utc>,
    pub agreement_confirmed_at: Option<DateTime<Utc>>,
    pub finalized_at: Option<DateTime<Utc>>,
    pub client_confirmed_finalized: bool,
    pub has_review: bool,
    pub review_general_score: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_states_are_confirmed_and_in_progress() {
        assert!(EngagementState::Confirmed.is_active());
        assert!(EngagementState::InProgress.is_active());
        assert!(!EngagementState::Contacted.is_active());
        assert!(!EngagementState::Finalized.is_active());
        assert!(!EngagementState::Cancelled.is_active());
    }

    #[test]
    fn terminal_states() {
        assert!(EngagementState::Finalized.is_terminal());
        assert!(EngagementState::Cancelled.is_terminal());
        assert!(!EngagementState::Contacted.is_terminal());
        assert!(!EngagementState::Confirmed.is_terminal());
        assert!(!EngagementState::InProgress.is_terminal());
    }

    #[test]
    fn state_serializes_as_snake_case() {
        let json = serde_json::to_string(&EngagementState::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let back: EngagementState = serde_json::from_str("\"finalized\"").unwrap();
        assert_eq!(back, EngagementState::Finalized);
    }
}
