// db/listingdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::listingmodel::{Listing, ListingImage, ListingStatus, ServiceCategory};

const LISTING_COLUMNS: &str = r#"
    id, provider_id, title, description, category, status, created_at, updated_at
"#;

#[async_trait]
pub trait ListingExt {
    async fn create_listing_with_images(
        &self,
        provider_id: Uuid,
        title: String,
        description: String,
        category: ServiceCategory,
        image_keys: Vec<String>,
    ) -> Result<(Listing, Vec<ListingImage>), Error>;

    async fn get_listing_by_id(&self, listing_id: Uuid) -> Result<Option<Listing>, Error>;

    async fn get_listings_for_provider(
        &self,
        provider_id: Uuid,
        status: ListingStatus,
    ) -> Result<Vec<Listing>, Error>;

    async fn get_listing_images(&self, listing_id: Uuid) -> Result<Vec<ListingImage>, Error>;

    async fn archive_listing(&self, listing_id: Uuid) -> Result<Listing, Error>;
}

#[async_trait]
impl ListingExt for DBClient {
    async fn create_listing_with_images(
        &self,
        provider_id: Uuid,
        title: String,
        description: String,
        category: ServiceCategory,
        image_keys: Vec<String>,
    ) -> Result<(Listing, Vec<ListingImage>), Error> {
        let mut tx = self.pool.begin().await?;

        let listing = sqlx::query_as::<_, Listing>(&format!(
            r#"
            INSERT INTO listings (provider_id, title, description, category)
            VALUES ($1, $2, $3, $4)
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(provider_id)
        .bind(title)
        .bind(description)
        .bind(category)
        .fetch_one(&mut *tx)
        .await?;

        let mut images = Vec::with_capacity(image_keys.len());
        for (position, key) in image_keys.into_iter().enumerate() {
            let image = sqlx::query_as::<_, ListingImage>(
                r#"
                INSERT INTO listing_images (listing_id, object_key, position)
                VALUES ($1, $2, $3)
                RETURNING id, listing_id, object_key, position, uploaded_at
                "#,
            )
            .bind(listing.id)
            .bind(key)
            .bind(position as i32)
            .fetch_one(&mut *tx)
            .await?;
            images.push(image);
        }

        tx.commit().await?;

        Ok((listing, images))
    }

    async fn get_listing_by_id(&self, listing_id: Uuid) -> Result<Option<Listing>, Error> {
        sqlx::query_as::<_, Listing>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM listings
            WHERE id = $1
            "#
        ))
        .bind(listing_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_listings_for_provider(
        &self,
        provider_id: Uuid,
        status: ListingStatus,
    ) -> Result<Vec<Listing>, Error> {
        sqlx::query_as::<_, Listing>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM listings
            WHERE provider_id = $1 AND status = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(provider_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_listing_images(&self, listing_id: Uuid) -> Result<Vec<ListingImage>, Error> {
        sqlx::query_as::<_, ListingImage>(
            r#"
            SELECT id, listing_id, object_key, position, uploaded_at
            FROM listing_images
            WHERE listing_id = $1
            ORDER BY position
            "#,
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn archive_listing(&self, listing_id: Uuid) -> Result<Listing, Error> {
        sqlx::query_as::<_, Listing>(&format!(
            r#"
            UPDATE listings
            SET status = 'archived', updated_at = NOW()
            WHERE id = $1
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(listing_id)
        .fetch_one(&self.pool)
        .await
    }
}
