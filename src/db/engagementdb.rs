// db/engagementdb.rs
use async_trait::async_trait;
use sqlx::{Error, Postgres, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::engagementmodel::*;

const ENGAGEMENT_COLUMNS: &str = r#"
    id, client_id, provider_id, listing_id,
    agreement_confirmed, state,
    contacted_at, agreement_confirmed_at, finalized_at,
    client_confirmed_finalized, client_confirmed_finalized_at
"#;

#[async_trait]
pub trait EngagementExt {
    async fn create_engagement(
        &self,
        client_id: Uuid,
        provider_id: Uuid,
        listing_id: Option<Uuid>,
    ) -> Result<Engagement, Error>;

    async fn get_engagement_by_id(&self, engagement_id: Uuid) -> Result<Option<Engagement>, Error>;

    /// Locks the engagement row for the duration of the transaction so
    /// concurrent transitions on the same engagement are linearized.
    async fn get_engagement_for_update(
        &self,
        engagement_id: Uuid,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<Engagement>, Error>;

    async fn confirm_agreement_tx(
        &self,
        engagement_id: Uuid,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Engagement, Error>;

    async fn update_engagement_state_tx(
        &self,
        engagement_id: Uuid,
        state: EngagementState,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Engagement, Error>;

    async fn finalize_engagement_tx(
        &self,
        engagement_id: Uuid,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Engagement, Error>;

    async fn set_client_finalization_ack(&self, engagement_id: Uuid)
        -> Result<Engagement, Error>;

    async fn get_active_engagements_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Engagement>, Error>;

    async fn get_finalized_engagements_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Engagement>, Error>;

    async fn get_engagements_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ClientEngagement>, Error>;
}

#[async_trait]
impl EngagementExt for DBClient {
    async fn create_engagement(
        &self,
        client_id: Uuid,
        provider_id: Uuid,
        listing_id: Option<Uuid>,
    ) -> Result<Engagement, Error> {
        sqlx::query_as::<_, Engagement>(&format!(
            r#"
            INSERT INTO engagements (client_id, provider_id, listing_id)
            VALUES ($1, $2, $3)
            RETURNING {ENGAGEMENT_COLUMNS}
            "#
        ))
        .bind(client_id)
        .bind(provider_id)
        .bind(listing_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_engagement_by_id(&self, engagement_id: Uuid) -> Result<Option<Engagement>, Error> {
        sqlx::query_as::<_, Engagement>(&format!(
            r#"
            SELECT {ENGAGEMENT_COLUMNS}
            FROM engagements
            WHERE id = $1
            "#
        ))
        .bind(engagement_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_engagement_for_update(
        &self,
        engagement_id: Uuid,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<Engagement>, Error> {
        sqlx::query_as::<_, Engagement>(&format!(
            r#"
            SELECT {ENGAGEMENT_COLUMNS}
            FROM engagements
            WHERE id = $1
            FOR UPDATE
            "#
        ))
        .bind(engagement_id)
        .fetch_optional(&mut **tx)
        .await
    }

    async fn confirm_agreement_tx(
        &self,
        engagement_id: Uuid,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Engagement, Error> {
        sqlx::query_as::<_, Engagement>(&format!(
            r#"
            UPDATE engagements
            SET state = 'confirmed',
                agreement_confirmed = TRUE,
                agreement_confirmed_at = NOW()
            WHERE id = $1
            RETURNING {ENGAGEMENT_COLUMNS}
            "#
        ))
        .bind(engagement_id)
        .fetch_one(&mut **tx)
        .await
    }

    async fn update_engagement_state_tx(
        &self,
        engagement_id: Uuid,
        state: EngagementState,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Engagement, Error> {
        sqlx::query_as::<_, Engagement>(&format!(
            r#"
            UPDATE engagements
            SET state = $2
            WHERE id = $1
            RETURNING {ENGAGEMENT_COLUMNS}
            "#
        ))
        .bind(engagement_id)
        .bind(state)
        .fetch_one(&mut **tx)
        .await
    }

    async fn finalize_engagement_tx(
        &self,
        engagement_id: Uuid,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Engagement, Error> {
        sqlx::query_as::<_, Engagement>(&format!(
            r#"
            UPDATE engagements
            SET state = 'finalized',
                finalized_at = NOW()
            WHERE id = $1
            RETURNING {ENGAGEMENT_COLUMNS}
            "#
        ))
        .bind(engagement_id)
        .fetch_one(&mut **tx)
        .await
    }

    async fn set_client_finalization_ack(
        &self,
        engagement_id: Uuid,
    ) -> Result<Engagement, Error> {
        sqlx::query_as::<_, Engagement>(&format!(
            r#"
            UPDATE engagements
            SET client_confirmed_finalized = TRUE,
                client_confirmed_finalized_at = COALESCE(client_confirmed_finalized_at, NOW())
            WHERE id = $1
            RETURNING {ENGAGEMENT_COLUMNS}
            "#
        ))
        .bind(engagement_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_active_engagements_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Engagement>, Error> {
        sqlx::query_as::<_, Engagement>(&format!(
            r#"
            SELECT {ENGAGEMENT_COLUMNS}
            FROM engagements
            WHERE provider_id = $1
              AND state IN ('confirmed', 'in_progress')
            ORDER BY contacted_at DESC
            "#
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_finalized_engagements_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Engagement>, Error> {
        sqlx::query_as::<_, Engagement>(&format!(
            r#"
            SELECT {ENGAGEMENT_COLUMNS}
            FROM engagements
            WHERE provider_id = $1
              AND state = 'finalized'
            ORDER BY finalized_at DESC
            "#
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_engagements_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ClientEngagement>, Error> {
        sqlx::query_as::<_, ClientEngagement>(
            r#"
            SELECT
                e.id, e.client_id, e.provider_id, e.listing_id,
                e.agreement_confirmed, e.state,
                e.contacted_at, e.agreement_confirmed_at, e.finalized_at,
                e.client_confirmed_finalized,
                (r.id IS NOT NULL) AS has_review,
                r.general_score AS review_general_score
            FROM engagements e
            LEFT JOIN reviews r ON r.engagement_id = e.id
            WHERE e.client_id = $1
              AND e.agreement_confirmed = TRUE
            ORDER BY e.contacted_at DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
    }
}
