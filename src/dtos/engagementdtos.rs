use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactProviderDto {
    pub provider_id: Uuid,
    pub listing_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HireOutcomeDto {
    /// True when the client and provider reached an agreement.
    pub achieved: bool,
}

#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
