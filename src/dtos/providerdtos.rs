use serde::{Deserialize, Serialize};
use validator::Validate;

use super::reviewdtos::ImageUploadDto;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ProviderApplicationDto {
    #[validate(length(min = 1, max = 100, message = "Display name is required"))]
    pub display_name: String,

    #[validate(length(min = 1, message = "At least one specialty is required"))]
    pub specialties: Vec<String>,

    #[validate(range(min = 0, max = 60, message = "Experience must be between 0 and 60 years"))]
    pub experience_years: i32,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub photos: Vec<ImageUploadDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationDecisionDto {
    pub approve: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCheckoutDto {
    pub plan_id: String,
    pub success_url: String,
    pub cancel_url: String,
}
