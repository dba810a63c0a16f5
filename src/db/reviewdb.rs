// db/reviewdb.rs
use async_trait::async_trait;
use sqlx::{Error, Postgres, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::reviewmodel::{Review, ReviewImage, ReviewScores};

const REVIEW_COLUMNS: &str = r#"
    id, engagement_id, client_id, provider_id,
    general_score, punctuality_score, quality_score, value_score,
    comment, recommendation, created_at
"#;

#[async_trait]
pub trait ReviewExt {
    /// Inserts the review and its image rows in one transaction and refreshes
    /// the provider's average rating. The 1:1 review-per-engagement invariant
    /// is the unique constraint on engagement_id; a violation surfaces from
    /// the INSERT itself, never from a pre-check.
    async fn create_review_with_images(
        &self,
        engagement_id: Uuid,
        client_id: Uuid,
        provider_id: Uuid,
        scores: ReviewScores,
        comment: Option<String>,
        recommendation: String,
        image_keys: Vec<String>,
    ) -> Result<(Review, Vec<ReviewImage>), Error>;

    async fn get_review_by_engagement(
        &self,
        engagement_id: Uuid,
    ) -> Result<Option<Review>, Error>;

    async fn get_reviews_for_provider(&self, provider_id: Uuid) -> Result<Vec<Review>, Error>;

    async fn get_reviews_by_client(&self, client_id: Uuid) -> Result<Vec<Review>, Error>;

    async fn get_review_images(&self, review_id: Uuid) -> Result<Vec<ReviewImage>, Error>;

    async fn refresh_provider_rating_tx(
        &self,
        provider_id: Uuid,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), Error>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn create_review_with_images(
        &self,
        engagement_id: Uuid,
        client_id: Uuid,
        provider_id: Uuid,
        scores: ReviewScores,
        comment: Option<String>,
        recommendation: String,
        image_keys: Vec<String>,
    ) -> Result<(Review, Vec<ReviewImage>), Error> {
        let mut tx = self.pool.begin().await?;

        let review = sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews
            (engagement_id, client_id, provider_id,
             general_score, punctuality_score, quality_score, value_score,
             comment, recommendation)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(engagement_id)
        .bind(client_id)
        .bind(provider_id)
        .bind(scores.general)
        .bind(scores.punctuality)
        .bind(scores.quality)
        .bind(scores.value)
        .bind(comment)
        .bind(recommendation)
        .fetch_one(&mut *tx)
        .await?;

        let mut images = Vec::with_capacity(image_keys.len());
        for key in image_keys {
            let image = sqlx::query_as::<_, ReviewImage>(
                r#"
                INSERT INTO review_images (review_id, object_key)
                VALUES ($1, $2)
                RETURNING id, review_id, object_key, uploaded_at
                "#,
            )
            .bind(review.id)
            .bind(key)
            .fetch_one(&mut *tx)
            .await?;
            images.push(image);
        }

        self.refresh_provider_rating_tx(provider_id, &mut tx).await?;

        tx.commit().await?;

        Ok((review, images))
    }

    async fn get_review_by_engagement(
        &self,
        engagement_id: Uuid,
    ) -> Result<Option<Review>, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE engagement_id = $1
            "#
        ))
        .bind(engagement_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_reviews_for_provider(&self, provider_id: Uuid) -> Result<Vec<Review>, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE provider_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_reviews_by_client(&self, client_id: Uuid) -> Result<Vec<Review>, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE client_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_review_images(&self, review_id: Uuid) -> Result<Vec<ReviewImage>, Error> {
        sqlx::query_as::<_, ReviewImage>(
            r#"
            SELECT id, review_id, object_key, uploaded_at
            FROM review_images
            WHERE review_id = $1
            ORDER BY uploaded_at
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn refresh_provider_rating_tx(
        &self,
        provider_id: Uuid,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE provider_profiles
            SET average_rating = (
                SELECT AVG(general_score)::REAL
                FROM reviews
                WHERE provider_id = $1
            )
            WHERE user_id = $1
            "#,
        )
        .bind(provider_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
