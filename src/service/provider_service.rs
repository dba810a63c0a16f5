// service/provider_service.rs
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, providerdb::ProviderExt, userdb::UserExt},
    models::usermodel::{ApplicationStatus, EvidencePhoto, ProviderProfile},
    service::{
        error::ServiceError,
        identity::IdentityProvider,
        review_service::{extension_for, ImageUpload},
        side_effect::best_effort,
        storage::ObjectStorage,
    },
};

pub const MAX_EVIDENCE_PHOTOS: usize = 10;

#[derive(Clone)]
pub struct ProviderService {
    db_client: Arc<DBClient>,
    storage: Arc<dyn ObjectStorage>,
    identity: Arc<dyn IdentityProvider>,
    provider_group: String,
    presign_ttl_secs: u64,
}

impl std::fmt::Debug for ProviderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderService")
            .field("db_client", &self.db_client)
            .field("provider_group", &self.provider_group)
            .finish()
    }
}

impl ProviderService {
    pub fn new(
        db_client: Arc<DBClient>,
        storage: Arc<dyn ObjectStorage>,
        identity: Arc<dyn IdentityProvider>,
        provider_group: String,
        presign_ttl_secs: u64,
    ) -> Self {
        Self {
            db_client,
            storage,
            identity,
            provider_group,
            presign_ttl_secs,
        }
    }

    /// Client applies to become a provider, with work-evidence photos.
    /// One application per user; a pending or approved profile blocks a new
    /// one.
    pub async fn apply(
        &self,
        user_id: Uuid,
        display_name: String,
        specialties: Vec<String>,
        experience_years: i32,
        description: Option<String>,
        photos: Vec<ImageUpload>,
    ) -> Result<ProviderApplicationResult, ServiceError> {
        if photos.len() > MAX_EVIDENCE_PHOTOS {
            return Err(ServiceError::Validation(format!(
                "An application can carry at most {} evidence photos, got {}",
                MAX_EVIDENCE_PHOTOS,
                photos.len()
            )));
        }

        if self.db_client.get_provider_profile(user_id).await?.is_some() {
            return Err(ServiceError::Validation(
                "An application already exists or the user is already a provider".to_string(),
            ));
        }

        let mut evidence_keys = Vec::with_capacity(photos.len());
        for photo in photos {
            let key = format!(
                "work-images/{}.{}",
                Uuid::new_v4(),
                extension_for(&photo.content_type)
            );
            match self.storage.put(&key, photo.bytes, &photo.content_type).await {
                Ok(stored_key) => evidence_keys.push(stored_key),
                Err(err) => {
                    self.discard_uploads(&evidence_keys).await;
                    return Err(ServiceError::Storage(err.to_string()));
                }
            }
        }

        let specialties = specialties.join(", ");

        let (profile, photos) = match self
            .db_client
            .create_provider_application(
                user_id,
                display_name,
                specialties,
                experience_years,
                description,
                evidence_keys.clone(),
            )
            .await
        {
            Ok(created) => created,
            Err(err) => {
                self.discard_uploads(&evidence_keys).await;
                return Err(err.into());
            }
        };

        tracing::info!("provider application {} created for user {}", profile.id, user_id);

        Ok(ProviderApplicationResult { profile, photos })
    }

    pub async fn pending_applications(&self) -> Result<Vec<ProviderProfile>, ServiceError> {
        Ok(self.db_client.get_pending_applications().await?)
    }

    /// Admin decision. Approval flips the user's role and syncs the external
    /// identity group (best-effort); rejection deletes the application and
    /// its evidence objects so the user can apply again.
    pub async fn decide(
        &self,
        profile_id: Uuid,
        approve: bool,
    ) -> Result<ApplicationDecision, ServiceError> {
        let profile = self
            .db_client
            .get_provider_profile_by_id(profile_id)
            .await?
            .ok_or(ServiceError::ProviderNotFound(profile_id))?;

        if profile.application_status != ApplicationStatus::Pending {
            return Err(ServiceError::Validation(format!(
                "Application is already {}",
                match profile.application_status {
                    ApplicationStatus::Approved => "approved",
                    ApplicationStatus::Rejected => "rejected",
                    ApplicationStatus::Pending => "pending",
                }
            )));
        }

        if approve {
            let approved = self
                .db_client
                .approve_provider_application(profile_id)
                .await?;

            if let Some(user) = self.db_client.get_user(approved.user_id).await? {
                let already_in_group = best_effort(
                    "identity group lookup",
                    self.identity.list_groups(&user.email),
                )
                .await
                .map(|groups| groups.iter().any(|group| group == &self.provider_group))
                .unwrap_or(false);

                if !already_in_group {
                    best_effort(
                        "identity group assignment",
                        self.identity.add_to_group(&user.email, &self.provider_group),
                    )
                    .await;
                }
            }

            tracing::info!("provider application {} approved", profile_id);

            Ok(ApplicationDecision::Approved(approved))
        } else {
            let evidence_keys = self
                .db_client
                .delete_provider_application(profile_id)
                .await?;

            for key in &evidence_keys {
                best_effort("evidence photo deletion", self.storage.delete(key)).await;
            }

            tracing::info!("provider application {} rejected and removed", profile_id);

            Ok(ApplicationDecision::Rejected)
        }
    }

    /// Evidence photos with temporary display URLs.
    pub async fn evidence_photos(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<EvidencePhotoWithUrl>, ServiceError> {
        let photos = self.db_client.get_evidence_photos(profile_id).await?;

        let mut result = Vec::with_capacity(photos.len());
        for photo in photos {
            let url = best_effort(
                "evidence photo presign",
                self.storage.temporary_url(&photo.object_key, self.presign_ttl_secs),
            )
            .await;
            result.push(EvidencePhotoWithUrl { photo, url });
        }

        Ok(result)
    }

    async fn discard_uploads(&self, keys: &[String]) {
        for key in keys {
            best_effort("evidence photo cleanup", self.storage.delete(key)).await;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProviderApplicationResult {
    pub profile: ProviderProfile,
    pub photos: Vec<EvidencePhoto>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ApplicationDecision {
    Approved(ProviderProfile),
    Rejected,
}

#[derive(Debug, Serialize)]
pub struct EvidencePhotoWithUrl {
    #[serde(flatten)]
    pub photo: EvidencePhoto,
    pub url: Option<String>,
}
