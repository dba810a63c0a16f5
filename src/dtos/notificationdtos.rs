use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub notification_ids: Option<Vec<Uuid>>,
}
