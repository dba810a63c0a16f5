use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Image payload, base64-encoded by the client. Decoded and uploaded to
/// object storage before the review row is written.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageUploadDto {
    pub data_base64: String,
    pub content_type: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitReviewDto {
    pub engagement_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "General score must be between 1 and 5"))]
    pub general_score: i32,

    #[validate(range(min = 1, max = 5, message = "Punctuality score must be between 1 and 5"))]
    pub punctuality_score: i32,

    #[validate(range(min = 1, max = 5, message = "Quality score must be between 1 and 5"))]
    pub quality_score: i32,

    #[validate(range(min = 1, max = 5, message = "Value score must be between 1 and 5"))]
    pub value_score: i32,

    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    pub comment: Option<String>,

    #[validate(length(min = 1, max = 20, message = "Recommendation is required"))]
    pub recommendation: String,

    #[serde(default)]
    pub images: Vec<ImageUploadDto>,
}
