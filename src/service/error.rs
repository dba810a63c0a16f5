use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{error::HttpError, models::engagementmodel::EngagementState};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Engagement {0} not found")]
    EngagementNotFound(Uuid),

    #[error("Listing {0} not found")]
    ListingNotFound(Uuid),

    #[error("Provider {0} not found")]
    ProviderNotFound(Uuid),

    #[error("Notification {0} not found")]
    NotificationNotFound(Uuid),

    #[error("Report {0} not found")]
    ReportNotFound(Uuid),

    #[error("User {0} is not authorized to perform this action on engagement {1}")]
    UnauthorizedEngagementAccess(Uuid, Uuid),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Engagement {0} is already finalized")]
    AlreadyFinalized(Uuid),

    #[error("Engagement {0} cannot be transitioned from its current state '{}'", .1.to_str())]
    InvalidEngagementState(Uuid, EngagementState),

    #[error("A review already exists for this engagement")]
    DuplicateReview(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Payment provider error: {0}")]
    Payment(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::EngagementNotFound(_)
            | ServiceError::ListingNotFound(_)
            | ServiceError::ProviderNotFound(_)
            | ServiceError::NotificationNotFound(_)
            | ServiceError::ReportNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::UnauthorizedEngagementAccess(_, _) | ServiceError::Forbidden(_) => {
                StatusCode::FORBIDDEN
            }

            ServiceError::AlreadyFinalized(_)
            | ServiceError::InvalidEngagementState(_, _)
            | ServiceError::DuplicateReview(_) => StatusCode::CONFLICT,

            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,

            ServiceError::Storage(_)
            | ServiceError::Payment(_)
            | ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        HttpError::new(error.to_string(), status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        let id = Uuid::nil();
        assert_eq!(
            ServiceError::EngagementNotFound(id).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::UnauthorizedEngagementAccess(id, id).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::AlreadyFinalized(id).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::DuplicateReview(id).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Validation("score out of range".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn state_conflict_message_names_the_current_state() {
        let err =
            ServiceError::InvalidEngagementState(Uuid::nil(), EngagementState::Contacted);
        assert!(err.to_string().contains("contacted"));
    }

    #[test]
    fn duplicate_review_message_leaks_no_identifiers() {
        let id = Uuid::new_v4();
        let err = ServiceError::DuplicateReview(id);
        assert!(!err.to_string().contains(&id.to_string()));
    }
}
