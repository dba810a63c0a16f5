use serde::{Deserialize, Serialize};
use validator::Validate;

use super::reviewdtos::ImageUploadDto;
use crate::models::listingmodel::ServiceCategory;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateListingDto {
    pub category: ServiceCategory,

    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,

    #[validate(length(min = 10, max = 2000, message = "Description must be between 10 and 2000 characters"))]
    pub description: String,

    #[serde(default)]
    pub images: Vec<ImageUploadDto>,
}
