// service/engagement_service.rs
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{
        db::DBClient,
        engagementdb::EngagementExt,
        listingdb::ListingExt,
        notificationdb::NotificationExt,
        providerdb::ProviderExt,
        userdb::UserExt,
    },
    models::{
        engagementmodel::{ClientEngagement, Engagement, EngagementState},
        notificationmodel::NotificationKind,
        usermodel::ActorRole,
    },
    service::{
        error::ServiceError, notification_service::NotificationService, side_effect::best_effort,
    },
};

/// Owns the engagement state machine. Every state-changing method runs in a
/// single transaction that locks the engagement row, applies the guard
/// against the locked state and writes the transition's notifications before
/// commit, so a state change and its alerts are never observed apart.
/// Optional notifications (cancellation) go through the sink after commit,
/// best-effort.
#[derive(Debug, Clone)]
pub struct EngagementService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

// Pure transition guards, applied against the row as read under the lock.

pub(crate) fn ensure_distinct_parties(
    client_id: Uuid,
    provider_id: Uuid,
) -> Result<(), ServiceError> {
    if client_id == provider_id {
        return Err(ServiceError::Validation(
            "Client and provider cannot be the same account".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn ensure_actor_is_client(
    engagement: &Engagement,
    actor_id: Uuid,
) -> Result<(), ServiceError> {
    if engagement.client_id != actor_id {
        return Err(ServiceError::UnauthorizedEngagementAccess(
            actor_id,
            engagement.id,
        ));
    }
    Ok(())
}

pub(crate) fn ensure_actor_is_provider(
    engagement: &Engagement,
    actor_id: Uuid,
) -> Result<(), ServiceError> {
    if engagement.provider_id != actor_id {
        return Err(ServiceError::UnauthorizedEngagementAccess(
            actor_id,
            engagement.id,
        ));
    }
    Ok(())
}

pub(crate) fn ensure_outcome_recordable(engagement: &Engagement) -> Result<(), ServiceError> {
    if engagement.state != EngagementState::Contacted {
        return Err(ServiceError::InvalidEngagementState(
            engagement.id,
            engagement.state,
        ));
    }
    Ok(())
}

pub(crate) fn ensure_startable(engagement: &Engagement) -> Result<(), ServiceError> {
    if engagement.state != EngagementState::Confirmed {
        return Err(ServiceError::InvalidEngagementState(
            engagement.id,
            engagement.state,
        ));
    }
    Ok(())
}

pub(crate) fn ensure_finalizable(engagement: &Engagement) -> Result<(), ServiceError> {
    if engagement.state == EngagementState::Finalized {
        return Err(ServiceError::AlreadyFinalized(engagement.id));
    }
    if !engagement.state.is_active() {
        return Err(ServiceError::InvalidEngagementState(
            engagement.id,
            engagement.state,
        ));
    }
    Ok(())
}

pub(crate) fn ensure_cancellable(engagement: &Engagement) -> Result<(), ServiceError> {
    if engagement.state.is_terminal() {
        return Err(ServiceError::InvalidEngagementState(
            engagement.id,
            engagement.state,
        ));
    }
    Ok(())
}

impl EngagementService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// First contact: creates the engagement in `contacted`. The provider
    /// must hold an approved profile; a referenced listing must exist and
    /// belong to that provider.
    pub async fn record_contact(
        &self,
        client_id: Uuid,
        provider_id: Uuid,
        listing_id: Option<Uuid>,
    ) -> Result<Engagement, ServiceError> {
        ensure_distinct_parties(client_id, provider_id)?;

        // One authoritative role lookup; only an approved provider can be
        // contacted.
        match self.db_client.get_actor_role(provider_id).await? {
            Some(ActorRole::Provider(_)) => {}
            _ => return Err(ServiceError::ProviderNotFound(provider_id)),
        }

        if let Some(listing_id) = listing_id {
            let listing = self
                .db_client
                .get_listing_by_id(listing_id)
                .await?
                .ok_or(ServiceError::ListingNotFound(listing_id))?;

            if listing.provider_id != provider_id {
                return Err(ServiceError::Validation(
                    "Listing does not belong to the contacted provider".to_string(),
                ));
            }
        }

        let engagement = self
            .db_client
            .create_engagement(client_id, provider_id, listing_id)
            .await?;

        tracing::info!(
            "engagement {} created: client {} contacted provider {}",
            engagement.id,
            client_id,
            provider_id
        );

        Ok(engagement)
    }

    /// Records the outcome of the hire conversation. On success the
    /// engagement moves to `confirmed` and both parties are notified; on
    /// failure the row stays `contacted` and only the client receives a
    /// feedback record.
    pub async fn record_hire_outcome(
        &self,
        engagement_id: Uuid,
        client_id: Uuid,
        achieved: bool,
    ) -> Result<HireOutcomeResult, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let engagement = self
            .db_client
            .get_engagement_for_update(engagement_id, &mut tx)
            .await?
            .ok_or(ServiceError::EngagementNotFound(engagement_id))?;

        ensure_actor_is_client(&engagement, client_id)?;
        ensure_distinct_parties(client_id, engagement.provider_id)?;
        ensure_outcome_recordable(&engagement)?;

        if achieved {
            let confirmed = self
                .db_client
                .confirm_agreement_tx(engagement_id, &mut tx)
                .await?;

            self.db_client
                .insert_notification_tx(
                    confirmed.provider_id,
                    NotificationKind::HireConfirmed,
                    Some(confirmed.id),
                    &format!("Client {} confirmed an agreement with you.", client_id),
                    &mut tx,
                )
                .await?;

            self.db_client
                .insert_notification_tx(
                    client_id,
                    NotificationKind::HireRegistered,
                    Some(confirmed.id),
                    &format!(
                        "Your agreement with provider {} has been recorded.",
                        confirmed.provider_id
                    ),
                    &mut tx,
                )
                .await?;

            tx.commit().await?;

            tracing::info!(
                "engagement {} confirmed by client {}",
                engagement_id,
                client_id
            );

            Ok(HireOutcomeResult {
                engagement: confirmed,
                confirmed: true,
            })
        } else {
            self.db_client
                .insert_notification_tx(
                    client_id,
                    NotificationKind::HireDeclined,
                    Some(engagement.id),
                    &format!(
                        "No agreement was reached with provider {}.",
                        engagement.provider_id
                    ),
                    &mut tx,
                )
                .await?;

            tx.commit().await?;

            tracing::info!(
                "engagement {} outcome recorded as declined by client {}",
                engagement_id,
                client_id
            );

            Ok(HireOutcomeResult {
                engagement,
                confirmed: false,
            })
        }
    }

    /// Provider starts work: `confirmed` → `in_progress`.
    pub async fn start_work(
        &self,
        engagement_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Engagement, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let engagement = self
            .db_client
            .get_engagement_for_update(engagement_id, &mut tx)
            .await?
            .ok_or(ServiceError::EngagementNotFound(engagement_id))?;

        ensure_actor_is_provider(&engagement, provider_id)?;
        ensure_startable(&engagement)?;

        let updated = self
            .db_client
            .update_engagement_state_tx(engagement_id, EngagementState::InProgress, &mut tx)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Provider marks the work finalized. Exactly one of two concurrent
    /// calls can succeed; the loser observes `finalized` under the lock and
    /// gets the conflict.
    pub async fn finalize(
        &self,
        engagement_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Engagement, ServiceError> {
        let provider_name = self
            .db_client
            .get_provider_profile(provider_id)
            .await?
            .map(|profile| profile.display_name)
            .unwrap_or_else(|| "Your provider".to_string());

        let mut tx = self.db_client.pool.begin().await?;

        let engagement = self
            .db_client
            .get_engagement_for_update(engagement_id, &mut tx)
            .await?
            .ok_or(ServiceError::EngagementNotFound(engagement_id))?;

        ensure_actor_is_provider(&engagement, provider_id)?;
        ensure_finalizable(&engagement)?;

        let finalized = self
            .db_client
            .finalize_engagement_tx(engagement_id, &mut tx)
            .await?;

        self.db_client
            .insert_notification_tx(
                finalized.client_id,
                NotificationKind::ServiceFinalized,
                Some(finalized.id),
                &format!("{} has finalized the service.", provider_name),
                &mut tx,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "engagement {} finalized by provider {}",
            engagement_id,
            provider_id
        );

        Ok(finalized)
    }

    /// Explicit cancellation from either participant. The counter-party
    /// notification is best-effort and happens after commit.
    pub async fn cancel(
        &self,
        engagement_id: Uuid,
        actor_id: Uuid,
    ) -> Result<Engagement, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let engagement = self
            .db_client
            .get_engagement_for_update(engagement_id, &mut tx)
            .await?
            .ok_or(ServiceError::EngagementNotFound(engagement_id))?;

        if engagement.client_id != actor_id && engagement.provider_id != actor_id {
            return Err(ServiceError::UnauthorizedEngagementAccess(
                actor_id,
                engagement_id,
            ));
        }
        ensure_cancellable(&engagement)?;

        let cancelled = self
            .db_client
            .update_engagement_state_tx(engagement_id, EngagementState::Cancelled, &mut tx)
            .await?;

        tx.commit().await?;

        let counter_party = if actor_id == cancelled.client_id {
            cancelled.provider_id
        } else {
            cancelled.client_id
        };

        best_effort(
            "cancellation notification",
            self.notification_service.notify(
                counter_party,
                NotificationKind::EngagementCancelled,
                "The engagement has been cancelled by the other party.",
                Some(cancelled.id),
            ),
        )
        .await;

        tracing::info!("engagement {} cancelled by {}", engagement_id, actor_id);

        Ok(cancelled)
    }

    /// Client-side acknowledgment of a finalized service. Independent flag;
    /// does not change the state. Idempotent.
    pub async fn confirm_client_finalization(
        &self,
        engagement_id: Uuid,
        client_id: Uuid,
    ) -> Result<Engagement, ServiceError> {
        let engagement = self
            .db_client
            .get_engagement_by_id(engagement_id)
            .await?
            .ok_or(ServiceError::EngagementNotFound(engagement_id))?;

        ensure_actor_is_client(&engagement, client_id)?;

        if engagement.state != EngagementState::Finalized {
            return Err(ServiceError::InvalidEngagementState(
                engagement_id,
                engagement.state,
            ));
        }

        let updated = self
            .db_client
            .set_client_finalization_ack(engagement_id)
            .await?;

        Ok(updated)
    }

    pub async fn get_engagement(&self, engagement_id: Uuid) -> Result<Engagement, ServiceError> {
        self.db_client
            .get_engagement_by_id(engagement_id)
            .await?
            .ok_or(ServiceError::EngagementNotFound(engagement_id))
    }

    pub async fn active_engagements_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Engagement>, ServiceError> {
        Ok(self
            .db_client
            .get_active_engagements_for_provider(provider_id)
            .await?)
    }

    pub async fn finalized_history_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Engagement>, ServiceError> {
        Ok(self
            .db_client
            .get_finalized_engagements_for_provider(provider_id)
            .await?)
    }

    pub async fn engagements_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ClientEngagement>, ServiceError> {
        Ok(self.db_client.get_engagements_for_client(client_id).await?)
    }
}

#[derive(Debug, Serialize)]
pub struct HireOutcomeResult {
    pub engagement: Engagement,
    pub confirmed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn engagement_in(state: EngagementState) -> Engagement {
        Engagement {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            listing_id: None,
            agreement_confirmed: matches!(
                state,
                EngagementState::Confirmed | EngagementState::InProgress | EngagementState::Finalized
            ),
            state,
            contacted_at: Utc::now(),
            agreement_confirmed_at: None,
            finalized_at: None,
            client_confirmed_finalized: false,
            client_confirmed_finalized_at: None,
        }
    }

    #[test]
    fn contact_rejects_self_dealing() {
        let id = Uuid::new_v4();
        assert!(matches!(
            ensure_distinct_parties(id, id),
            Err(ServiceError::Validation(_))
        ));
        assert!(ensure_distinct_parties(Uuid::new_v4(), Uuid::new_v4()).is_ok());
    }

    #[test]
    fn only_the_engagement_client_may_record_an_outcome() {
        let engagement = engagement_in(EngagementState::Contacted);
        let stranger = Uuid::new_v4();
        assert!(matches!(
            ensure_actor_is_client(&engagement, stranger),
            Err(ServiceError::UnauthorizedEngagementAccess(_, _))
        ));
        assert!(ensure_actor_is_client(&engagement, engagement.client_id).is_ok());
    }

    #[test]
    fn outcome_is_only_recordable_from_contacted() {
        assert!(ensure_outcome_recordable(&engagement_in(EngagementState::Contacted)).is_ok());
        for state in [
            EngagementState::Confirmed,
            EngagementState::InProgress,
            EngagementState::Finalized,
            EngagementState::Cancelled,
        ] {
            assert!(matches!(
                ensure_outcome_recordable(&engagement_in(state)),
                Err(ServiceError::InvalidEngagementState(_, _))
            ));
        }
    }

    #[test]
    fn finalize_accepts_confirmed_and_in_progress_only() {
        assert!(ensure_finalizable(&engagement_in(EngagementState::Confirmed)).is_ok());
        assert!(ensure_finalizable(&engagement_in(EngagementState::InProgress)).is_ok());
    }

    #[test]
    fn finalizing_twice_is_a_distinct_conflict() {
        let engagement = engagement_in(EngagementState::Finalized);
        assert!(matches!(
            ensure_finalizable(&engagement),
            Err(ServiceError::AlreadyFinalized(_))
        ));
    }

    #[test]
    fn finalize_from_contacted_or_cancelled_names_the_state() {
        for state in [EngagementState::Contacted, EngagementState::Cancelled] {
            let err = ensure_finalizable(&engagement_in(state)).unwrap_err();
            assert!(err.to_string().contains(state.to_str()));
        }
    }

    #[test]
    fn terminal_states_cannot_be_cancelled() {
        assert!(ensure_cancellable(&engagement_in(EngagementState::Contacted)).is_ok());
        assert!(ensure_cancellable(&engagement_in(EngagementState::Confirmed)).is_ok());
        assert!(ensure_cancellable(&engagement_in(EngagementState::InProgress)).is_ok());
        assert!(ensure_cancellable(&engagement_in(EngagementState::Finalized)).is_err());
        assert!(ensure_cancellable(&engagement_in(EngagementState::Cancelled)).is_err());
    }

    #[test]
    fn work_starts_only_from_confirmed() {
        assert!(ensure_startable(&engagement_in(EngagementState::Confirmed)).is_ok());
        assert!(ensure_startable(&engagement_in(EngagementState::Contacted)).is_err());
        assert!(ensure_startable(&engagement_in(EngagementState::InProgress)).is_err());
    }
}
