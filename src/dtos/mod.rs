pub mod engagementdtos;
pub mod listingdtos;
pub mod notificationdtos;
pub mod providerdtos;
pub mod reportdtos;
pub mod reviewdtos;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data,
        }
    }
}
