// db/subscriptiondb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::subscriptionmodel::{Subscription, SubscriptionStatus};

const SUBSCRIPTION_COLUMNS: &str = r#"
    id, user_id, plan_id, checkout_session_id, status, started_at, ended_at, created_at
"#;

#[async_trait]
pub trait SubscriptionExt {
    async fn create_pending_subscription(
        &self,
        user_id: Uuid,
        plan_id: &str,
        checkout_session_id: &str,
    ) -> Result<Subscription, Error>;

    async fn activate_subscription(
        &self,
        checkout_session_id: &str,
    ) -> Result<Option<Subscription>, Error>;

    async fn cancel_subscription(
        &self,
        checkout_session_id: &str,
    ) -> Result<Option<Subscription>, Error>;

    async fn get_subscription_for_user(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<Option<Subscription>, Error>;
}

#[async_trait]
impl SubscriptionExt for DBClient {
    async fn create_pending_subscription(
        &self,
        user_id: Uuid,
        plan_id: &str,
        checkout_session_id: &str,
    ) -> Result<Subscription, Error> {
        sqlx::query_as::<_, Subscription>(&format!(
            r#"
            INSERT INTO subscriptions (user_id, plan_id, checkout_session_id)
            VALUES ($1, $2, $3)
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(plan_id)
        .bind(checkout_session_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn activate_subscription(
        &self,
        checkout_session_id: &str,
    ) -> Result<Option<Subscription>, Error> {
        sqlx::query_as::<_, Subscription>(&format!(
            r#"
            UPDATE subscriptions
            SET status = 'active', started_at = NOW()
            WHERE checkout_session_id = $1 AND status = 'pending'
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(checkout_session_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn cancel_subscription(
        &self,
        checkout_session_id: &str,
    ) -> Result<Option<Subscription>, Error> {
        sqlx::query_as::<_, Subscription>(&format!(
            r#"
            UPDATE subscriptions
            SET status = 'cancelled', ended_at = NOW()
            WHERE checkout_session_id = $1 AND status <> 'cancelled'
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(checkout_session_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_subscription_for_user(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<Option<Subscription>, Error> {
        sqlx::query_as::<_, Subscription>(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM subscriptions
            WHERE user_id = $1 AND status = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }
}
