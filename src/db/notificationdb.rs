// db/notificationdb.rs
use async_trait::async_trait;
use sqlx::{Error, Postgres, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::notificationmodel::{Notification, NotificationKind};

const NOTIFICATION_COLUMNS: &str = r#"
    id, recipient_id, engagement_id, kind, message, is_read, sent_at, read_at
"#;

#[async_trait]
pub trait NotificationExt {
    async fn insert_notification(
        &self,
        recipient_id: Uuid,
        kind: NotificationKind,
        engagement_id: Option<Uuid>,
        message: &str,
    ) -> Result<Notification, Error>;

    /// Same append, but inside the caller's transaction so a state change and
    /// its notifications commit or roll back together.
    async fn insert_notification_tx(
        &self,
        recipient_id: Uuid,
        kind: NotificationKind,
        engagement_id: Option<Uuid>,
        message: &str,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Notification, Error>;

    /// Notifications whose linked engagement still exists, newest first.
    /// Rows without a live engagement link are filtered out.
    async fn get_notifications_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, Error>;

    async fn get_notification_by_id(
        &self,
        notification_id: Uuid,
    ) -> Result<Option<Notification>, Error>;

    /// Idempotent: re-marking an already-read notification keeps the original
    /// read_at stamp and does not error.
    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
    ) -> Result<Notification, Error>;

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, Error>;

    async fn unread_count(&self, user_id: Uuid) -> Result<i64, Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn insert_notification(
        &self,
        recipient_id: Uuid,
        kind: NotificationKind,
        engagement_id: Option<Uuid>,
        message: &str,
    ) -> Result<Notification, Error> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (recipient_id, kind, engagement_id, message)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(recipient_id)
        .bind(kind)
        .bind(engagement_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await
    }

    async fn insert_notification_tx(
        &self,
        recipient_id: Uuid,
        kind: NotificationKind,
        engagement_id: Option<Uuid>,
        message: &str,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Notification, Error> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (recipient_id, kind, engagement_id, message)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(recipient_id)
        .bind(kind)
        .bind(engagement_id)
        .bind(message)
        .fetch_one(&mut **tx)
        .await
    }

    async fn get_notifications_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT n.id, n.recipient_id, n.engagement_id, n.kind, n.message,
                   n.is_read, n.sent_at, n.read_at
            FROM notifications n
            JOIN engagements e ON e.id = n.engagement_id
            WHERE n.recipient_id = $1
            ORDER BY n.sent_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_notification_by_id(
        &self,
        notification_id: Uuid,
    ) -> Result<Option<Notification>, Error> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE id = $1
            "#
        ))
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
    ) -> Result<Notification, Error> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications
            SET is_read = TRUE,
                read_at = COALESCE(read_at, NOW())
            WHERE id = $1
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(notification_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE,
                read_at = COALESCE(read_at, NOW())
            WHERE recipient_id = $1 AND is_read = FALSE
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn unread_count(&self, user_id: Uuid) -> Result<i64, Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM notifications n
            JOIN engagements e ON e.id = n.engagement_id
            WHERE n.recipient_id = $1 AND n.is_read = FALSE
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }
}
