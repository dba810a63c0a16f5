use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "notification_kind", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    HireConfirmed,
    HireRegistered,
    HireDeclined,
    ServiceFinalized,
    EngagementCancelled,
    NewReview,
    NewReport,
}

impl NotificationKind {
    pub fn to_str(&self) -> &str {
        match self {
            NotificationKind::HireConfirmed => "hire-confirmed",
            NotificationKind::HireRegistered => "hire-registered",
            NotificationKind::HireDeclined => "hire-declined",
            NotificationKind::ServiceFinalized => "service-finalized",
            NotificationKind::EngagementCancelled => "engagement-cancelled",
            NotificationKind::NewReview => "new-review",
            NotificationKind::NewReport => "new-report",
        }
    }
}

/// Directed message to exactly one user. Append-only; the read flag is the
/// only mutable field.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub engagement_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub message: String,
    pub is_read: bool,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_as_kebab_case() {
        let json = serde_json::to_string(&NotificationKind::ServiceFinalized).unwrap();
        assert_eq!(json, "\"service-finalized\"");
        let back: NotificationKind = serde_json::from_str("\"hire-confirmed\"").unwrap();
        assert_eq!(back, NotificationKind::HireConfirmed);
    }

    #[test]
    fn to_str_matches_serde_tag() {
        for kind in [
            NotificationKind::HireConfirmed,
            NotificationKind::HireRegistered,
            NotificationKind::HireDeclined,
            NotificationKind::ServiceFinalized,
            NotificationKind::EngagementCancelled,
            NotificationKind::NewReview,
            NotificationKind::NewReport,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.to_str()));
        }
    }
}
