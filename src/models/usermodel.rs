use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Provider,
    Admin,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Client => "client",
            UserRole::Provider => "provider",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub photo_key: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Provider-side profile. Created in `pending` by a provider application and
/// flipped to `approved` by an admin decision.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProviderProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub specialties: String,
    pub experience_years: i32,
    pub description: Option<String>,
    pub average_rating: Option<f32>,
    pub photo_key: Option<String>,
    pub application_status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

/// Work-evidence photo attached to a provider application. Only the object
/// key is stored; display URLs are presigned at read time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EvidencePhoto {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub object_key: String,
    pub caption: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Authoritative role of an acting user, resolved in one lookup instead of
/// probing optional relations.
#[derive(Debug, Clone, Serialize)]
pub enum ActorRole {
    Client,
    Provider(ProviderProfile),
    Admin,
}
