// service/review_service.rs
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, notificationdb::NotificationExt, reviewdb::ReviewExt},
    models::{
        engagementmodel::{Engagement, EngagementState},
        notificationmodel::NotificationKind,
        reviewmodel::{Review, ReviewImage, ReviewScores, MAX_REVIEW_IMAGES, MAX_SCORE, MIN_SCORE},
    },
    service::{
        engagement_service::ensure_actor_is_client,
        error::ServiceError,
        side_effect::best_effort,
        storage::ObjectStorage,
    },
};
use crate::db::engagementdb::EngagementExt;

/// Raw image payload attached to a review submission. Uploaded through the
/// object-storage port; only the resulting key is persisted.
#[derive(Debug)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Clone)]
pub struct ReviewService {
    db_client: Arc<DBClient>,
    storage: Arc<dyn ObjectStorage>,
    presign_ttl_secs: u64,
}

impl std::fmt::Debug for ReviewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewService")
            .field("db_client", &self.db_client)
            .finish()
    }
}

pub(crate) fn validate_scores(scores: &ReviewScores) -> Result<(), ServiceError> {
    for (name, value) in scores.as_pairs() {
        if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
            return Err(ServiceError::Validation(format!(
                "{} score must be between {} and {}, got {}",
                name, MIN_SCORE, MAX_SCORE, value
            )));
        }
    }
    Ok(())
}

/// Exceeding the cap rejects the whole submission; nothing is truncated.
pub(crate) fn validate_image_count(count: usize) -> Result<(), ServiceError> {
    if count > MAX_REVIEW_IMAGES {
        return Err(ServiceError::Validation(format!(
            "A review can carry at most {} images, got {}",
            MAX_REVIEW_IMAGES, count
        )));
    }
    Ok(())
}

pub(crate) fn ensure_reviewable(engagement: &Engagement) -> Result<(), ServiceError> {
    if engagement.state != EngagementState::Finalized {
        return Err(ServiceError::InvalidEngagementState(
            engagement.id,
            engagement.state,
        ));
    }
    Ok(())
}

pub(crate) fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

impl ReviewService {
    pub fn new(
        db_client: Arc<DBClient>,
        storage: Arc<dyn ObjectStorage>,
        presign_ttl_secs: u64,
    ) -> Self {
        Self {
            db_client,
            storage,
            presign_ttl_secs,
        }
    }

    /// Submits the single review a client may leave on a finalized
    /// engagement. The 1:1 invariant is enforced by the database unique
    /// constraint; a duplicate surfaces from the insert as a conflict.
    pub async fn submit_review(
        &self,
        engagement_id: Uuid,
        client_id: Uuid,
        scores: ReviewScores,
        comment: Option<String>,
        recommendation: String,
        images: Vec<ImageUpload>,
    ) -> Result<ReviewSubmissionResult, ServiceError> {
        validate_scores(&scores)?;
        validate_image_count(images.len())?;

        let engagement = self
            .db_client
            .get_engagement_by_id(engagement_id)
            .await?
            .ok_or(ServiceError::EngagementNotFound(engagement_id))?;

        ensure_actor_is_client(&engagement, client_id)?;
        ensure_reviewable(&engagement)?;

        let comment = comment.map(|text| ammonia::clean(&text));

        let mut image_keys = Vec::with_capacity(images.len());
        for image in images {
            let key = format!(
                "reviews/{}.{}",
                Uuid::new_v4(),
                extension_for(&image.content_type)
            );
            match self.storage.put(&key, image.bytes, &image.content_type).await {
                Ok(stored_key) => image_keys.push(stored_key),
                Err(err) => {
                    self.discard_uploads(&image_keys).await;
                    return Err(ServiceError::Storage(err.to_string()));
                }
            }
        }

        let (review, stored_images) = match self
            .db_client
            .create_review_with_images(
                engagement_id,
                client_id,
                engagement.provider_id,
                scores,
                comment,
                recommendation,
                image_keys.clone(),
            )
            .await
        {
            Ok(created) => created,
            Err(err) => {
                self.discard_uploads(&image_keys).await;
                if let sqlx::Error::Database(db_err) = &err {
                    if db_err.is_unique_violation() {
                        return Err(ServiceError::DuplicateReview(engagement_id));
                    }
                }
                return Err(err.into());
            }
        };

        best_effort(
            "review notification",
            self.db_client.insert_notification(
                engagement.provider_id,
                NotificationKind::NewReview,
                Some(engagement_id),
                "You received a new review for a finalized service.",
            ),
        )
        .await;

        tracing::info!(
            "review {} created for engagement {} by client {}",
            review.id,
            engagement_id,
            client_id
        );

        Ok(ReviewSubmissionResult {
            review,
            images: stored_images,
        })
    }

    pub async fn reviews_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<ReviewWithImages>, ServiceError> {
        let reviews = self.db_client.get_reviews_for_provider(provider_id).await?;
        self.attach_image_urls(reviews).await
    }

    pub async fn reviews_by_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ReviewWithImages>, ServiceError> {
        let reviews = self.db_client.get_reviews_by_client(client_id).await?;
        self.attach_image_urls(reviews).await
    }

    async fn attach_image_urls(
        &self,
        reviews: Vec<Review>,
    ) -> Result<Vec<ReviewWithImages>, ServiceError> {
        let mut result = Vec::with_capacity(reviews.len());
        for review in reviews {
            let images = self.db_client.get_review_images(review.id).await?;
            let mut image_urls = Vec::with_capacity(images.len());
            for image in &images {
                // Display URLs are resolved lazily; a presign failure hides
                // the image but never fails the listing.
                if let Some(url) = best_effort(
                    "review image presign",
                    self.storage.temporary_url(&image.object_key, self.presign_ttl_secs),
                )
                .await
                {
                    image_urls.push(url);
                }
            }
            result.push(ReviewWithImages { review, image_urls });
        }
        Ok(result)
    }

    async fn discard_uploads(&self, keys: &[String]) {
        for key in keys {
            best_effort("review image cleanup", self.storage.delete(key)).await;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewSubmissionResult {
    pub review: Review,
    pub images: Vec<ReviewImage>,
}

#[derive(Debug, Serialize)]
pub struct ReviewWithImages {
    pub review: Review,
    pub image_urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn scores(general: i32) -> ReviewScores {
        ReviewScores {
            general,
            punctuality: 4,
            quality: 5,
            value: 3,
        }
    }

    fn finalized_engagement() -> Engagement {
        Engagement {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            listing_id: None,
            agreement_confirmed: true,
            state: EngagementState::Finalized,
            contacted_at: Utc::now(),
            agreement_confirmed_at: Some(Utc::now()),
            finalized_at: Some(Utc::now()),
            client_confirmed_finalized: false,
            client_confirmed_finalized_at: None,
        }
    }

    #[test]
    fn scores_must_lie_in_bounds() {
        assert!(validate_scores(&scores(1)).is_ok());
        assert!(validate_scores(&scores(5)).is_ok());

        let err = validate_scores(&scores(6)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().contains("general"));

        assert!(validate_scores(&scores(0)).is_err());
    }

    #[test]
    fn sixth_image_rejects_the_whole_call() {
        assert!(validate_image_count(0).is_ok());
        assert!(validate_image_count(MAX_REVIEW_IMAGES).is_ok());
        assert!(matches!(
            validate_image_count(MAX_REVIEW_IMAGES + 1),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn only_finalized_engagements_are_reviewable() {
        assert!(ensure_reviewable(&finalized_engagement()).is_ok());

        let mut engagement = finalized_engagement();
        engagement.state = EngagementState::Confirmed;
        assert!(matches!(
            ensure_reviewable(&engagement),
            Err(ServiceError::InvalidEngagementState(_, _))
        ));
    }

    #[test]
    fn content_type_maps_to_extension() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/webp"), "webp");
        assert_eq!(extension_for("application/octet-stream"), "jpg");
    }
}
