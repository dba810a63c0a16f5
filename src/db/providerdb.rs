// db/providerdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use super::userdb::{UserExt, PROVIDER_COLUMNS};
use crate::models::usermodel::{EvidencePhoto, ProviderProfile, UserRole};

#[async_trait]
pub trait ProviderExt {
    async fn create_provider_application(
        &self,
        user_id: Uuid,
        display_name: String,
        specialties: String,
        experience_years: i32,
        description: Option<String>,
        evidence_keys: Vec<String>,
    ) -> Result<(ProviderProfile, Vec<EvidencePhoto>), Error>;

    async fn get_provider_profile(&self, user_id: Uuid) -> Result<Option<ProviderProfile>, Error>;

    async fn get_provider_profile_by_id(
        &self,
        profile_id: Uuid,
    ) -> Result<Option<ProviderProfile>, Error>;

    async fn get_pending_applications(&self) -> Result<Vec<ProviderProfile>, Error>;

    /// Flips the application to approved and the user's role to provider in
    /// one transaction.
    async fn approve_provider_application(&self, profile_id: Uuid)
        -> Result<ProviderProfile, Error>;

    /// Deletes the application and its evidence rows, returning the object
    /// keys so the caller can clean up storage.
    async fn delete_provider_application(&self, profile_id: Uuid) -> Result<Vec<String>, Error>;

    async fn get_evidence_photos(&self, provider_id: Uuid) -> Result<Vec<EvidencePhoto>, Error>;
}

#[async_trait]
impl ProviderExt for DBClient {
    async fn create_provider_application(
        &self,
        user_id: Uuid,
        display_name: String,
        specialties: String,
        experience_years: i32,
        description: Option<String>,
        evidence_keys: Vec<String>,
    ) -> Result<(ProviderProfile, Vec<EvidencePhoto>), Error> {
        let mut tx = self.pool.begin().await?;

        let profile = sqlx::query_as::<_, ProviderProfile>(&format!(
            r#"
            INSERT INTO provider_profiles
            (user_id, display_name, specialties, experience_years, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PROVIDER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(display_name)
        .bind(specialties)
        .bind(experience_years)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;

        let mut photos = Vec::with_capacity(evidence_keys.len());
        for key in evidence_keys {
            let photo = sqlx::query_as::<_, EvidencePhoto>(
                r#"
                INSERT INTO evidence_photos (provider_id, object_key, caption)
                VALUES ($1, $2, $3)
                RETURNING id, provider_id, object_key, caption, uploaded_at
                "#,
            )
            .bind(profile.id)
            .bind(key)
            .bind("Work evidence (application)")
            .fetch_one(&mut *tx)
            .await?;
            photos.push(photo);
        }

        tx.commit().await?;

        Ok((profile, photos))
    }

    async fn get_provider_profile(&self, user_id: Uuid) -> Result<Option<ProviderProfile>, Error> {
        sqlx::query_as::<_, ProviderProfile>(&format!(
            r#"
            SELECT {PROVIDER_COLUMNS}
            FROM provider_profiles
            WHERE user_id = $1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_provider_profile_by_id(
        &self,
        profile_id: Uuid,
    ) -> Result<Option<ProviderProfile>, Error> {
        sqlx::query_as::<_, ProviderProfile>(&format!(
            r#"
            SELECT {PROVIDER_COLUMNS}
            FROM provider_profiles
            WHERE id = $1
            "#
        ))
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_pending_applications(&self) -> Result<Vec<ProviderProfile>, Error> {
        sqlx::query_as::<_, ProviderProfile>(&format!(
            r#"
            SELECT {PROVIDER_COLUMNS}
            FROM provider_profiles
            WHERE application_status = 'pending'
            ORDER BY applied_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn approve_provider_application(
        &self,
        profile_id: Uuid,
    ) -> Result<ProviderProfile, Error> {
        let mut tx = self.pool.begin().await?;

        let profile = sqlx::query_as::<_, ProviderProfile>(&format!(
            r#"
            UPDATE provider_profiles
            SET application_status = 'approved',
                approved_at = NOW()
            WHERE id = $1
            RETURNING {PROVIDER_COLUMNS}
            "#
        ))
        .bind(profile_id)
        .fetch_one(&mut *tx)
        .await?;

        self.set_user_role_tx(profile.user_id, UserRole::Provider, &mut tx)
            .await?;

        tx.commit().await?;

        Ok(profile)
    }

    async fn delete_provider_application(&self, profile_id: Uuid) -> Result<Vec<String>, Error> {
        let mut tx = self.pool.begin().await?;

        let keys: Vec<String> = sqlx::query_scalar(
            r#"
            DELETE FROM evidence_photos
            WHERE provider_id = $1
            RETURNING object_key
            "#,
        )
        .bind(profile_id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM provider_profiles WHERE id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(keys)
    }

    async fn get_evidence_photos(&self, provider_id: Uuid) -> Result<Vec<EvidencePhoto>, Error> {
        sqlx::query_as::<_, EvidencePhoto>(
            r#"
            SELECT id, provider_id, object_key, caption, uploaded_at
            FROM evidence_photos
            WHERE provider_id = $1
            ORDER BY uploaded_at
            "#,
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }
}
