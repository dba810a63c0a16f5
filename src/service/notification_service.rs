// service/notification_service.rs
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{
        db::DBClient, engagementdb::EngagementExt, notificationdb::NotificationExt,
        providerdb::ProviderExt,
    },
    models::notificationmodel::{Notification, NotificationKind},
    service::{error::ServiceError, side_effect::best_effort, storage::ObjectStorage},
};

#[derive(Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
    storage: Arc<dyn ObjectStorage>,
    presign_ttl_secs: u64,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("db_client", &self.db_client)
            .finish()
    }
}

/// Provider context attached to a listed notification, so the client-facing
/// feed can render who the alert is about.
#[derive(Debug, Serialize)]
pub struct NotificationProviderInfo {
    pub provider_id: Uuid,
    pub display_name: String,
    pub average_rating: Option<f32>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationWithContext {
    #[serde(flatten)]
    pub notification: Notification,
    pub provider: Option<NotificationProviderInfo>,
}

impl NotificationService {
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

    /// Pure append; no business logic lives here.
    pub async fn notify(
        &self,
        recipient_id: Uuid,
        kind: NotificationKind,
        message: &str,
        engagement_id: Option<Uuid>,
    ) -> Result<Notification, ServiceError> {
        tracing::info!(
            "notification {} for user {}: {}",
            kind.to_str(),
            recipient_id,
            message
        );

        Ok(self
            .db_client
            .insert_notification(recipient_id, kind, engagement_id, message)
            .await?)
    }

    /// Notifications for a user, newest first, enriched with the provider of
    /// the linked engagement. Rows whose engagement no longer exists are
    /// filtered out at the query level.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationWithContext>, ServiceError> {
        let notifications = self
            .db_client
            .get_notifications_for_user(user_id, limit, offset)
            .await?;

        let mut result = Vec::with_capacity(notifications.len());
        for notification in notifications {
            let provider = match notification.engagement_id {
                Some(engagement_id) => self.provider_context(engagement_id).await?,
                None => None,
            };
            result.push(NotificationWithContext {
                notification,
                provider,
            });
        }

        Ok(result)
    }

    async fn provider_context(
        &self,
        engagement_id: Uuid,
    ) -> Result<Option<NotificationProviderInfo>, ServiceError> {
        let engagement = match self.db_client.get_engagement_by_id(engagement_id).await? {
            Some(engagement) => engagement,
            None => return Ok(None),
        };

        let profile = match self
            .db_client
            .get_provider_profile(engagement.provider_id)
            .await?
        {
            Some(profile) => profile,
            None => return Ok(None),
        };

        let photo_url = match &profile.photo_key {
            Some(key) => {
                best_effort(
                    "provider photo presign",
                    self.storage.temporary_url(key, self.presign_ttl_secs),
                )
                .await
            }
            None => None,
        };

        Ok(Some(NotificationProviderInfo {
            provider_id: engagement.provider_id,
            display_name: profile.display_name,
            average_rating: profile.average_rating,
            photo_url,
        }))
    }

    /// Idempotent: the second call on an already-read notification is a
    /// no-op, not an error.
    pub async fn mark_read(&self, notification_id: Uuid) -> Result<Notification, ServiceError> {
        self.db_client
            .get_notification_by_id(notification_id)
            .await?
            .ok_or(ServiceError::NotificationNotFound(notification_id))?;

        Ok(self
            .db_client
            .mark_notification_read(notification_id)
            .await?)
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, ServiceError> {
        Ok(self.db_client.mark_all_notifications_read(user_id).await?)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, ServiceError> {
        Ok(self.db_client.unread_count(user_id).await?)
    }
}
