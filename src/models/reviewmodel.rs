use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;
pub const MAX_REVIEW_IMAGES: usize = 5;

/// Review left by the client of a finalized engagement. At most one per
/// engagement, enforced by a unique constraint on engagement_id. Immutable
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub engagement_id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub general_score: i32,
    pub punctuality_score: i32,
    pub quality_score: i32,
    pub value_score: i32,
    pub comment: Option<String>,
    pub recommendation: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReviewScores {
    pub general: i32,
    pub punctuality: i32,
    pub quality: i32,
    pub value: i32,
}

impl ReviewScores {
    pub fn as_pairs(&self) -> [(&'static str, i32); 4] {
        [
            ("general", self.general),
            ("punctuality", self.punctuality),
            ("quality", self.quality),
            ("value", self.value),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewImage {
    pub id: Uuid,
    pub review_id: Uuid,
    pub object_key: String,
    pub uploaded_at: DateTime<Utc>,
}
