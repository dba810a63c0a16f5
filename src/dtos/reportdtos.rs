use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::reportmodel::ReportStatus;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct FileReportDto {
    pub engagement_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Motive must be between 1 and 200 characters"))]
    pub motive: String,

    #[validate(length(min = 1, max = 2000, message = "Description must be between 1 and 2000 characters"))]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewReportDto {
    pub status: ReportStatus,
    pub admin_comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportFilterParams {
    pub status: Option<ReportStatus>,
}
