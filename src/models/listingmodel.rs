use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_LISTING_IMAGES: usize = 10;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "service_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Plumbing,
    Electrical,
    Painting,
    Carpentry,
    Masonry,
    Roofing,
    Hvac,
    Cleaning,
    Gardening,
    PestControl,
    ApplianceRepair,
    Locksmith,
    Other,
}

impl ServiceCategory {
    pub fn to_str(&self) -> &str {
        match self {
            ServiceCategory::Plumbing => "plumbing",
            ServiceCategory::Electrical => "electrical",
            ServiceCategory::Painting => "painting",
            ServiceCategory::Carpentry => "carpentry",
            ServiceCategory::Masonry => "masonry",
            ServiceCategory::Roofing => "roofing",
            ServiceCategory::Hvac => "hvac",
            ServiceCategory::Cleaning => "cleaning",
            ServiceCategory::Gardening => "gardening",
            ServiceCategory::PestControl => "pest_control",
            ServiceCategory::ApplianceRepair => "appliance_repair",
            ServiceCategory::Locksmith => "locksmith",
            ServiceCategory::Other => "other",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "listing_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    Archived,
}

/// Published service offer from a provider. Engagements may reference one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ServiceCategory,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ListingImage {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub object_key: String,
    pub position: i32,
    pub uploaded_at: DateTime<Utc>,
}
