// service/report_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{
        db::DBClient, engagementdb::EngagementExt, notificationdb::NotificationExt,
        reportdb::ReportExt,
    },
    models::{
        engagementmodel::{Engagement, EngagementState},
        notificationmodel::NotificationKind,
        reportmodel::{Report, ReportStatus},
    },
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct ReportService {
    db_client: Arc<DBClient>,
    admin_recipient_id: Uuid,
}

/// Only finalized engagements may be reported, and only by their client.
pub(crate) fn ensure_reportable(
    engagement: &Engagement,
    reporter_id: Uuid,
) -> Result<(), ServiceError> {
    if reporter_id == engagement.provider_id {
        return Err(ServiceError::Forbidden(
            "You cannot report your own account".to_string(),
        ));
    }
    if engagement.client_id != reporter_id {
        return Err(ServiceError::UnauthorizedEngagementAccess(
            reporter_id,
            engagement.id,
        ));
    }
    if engagement.state != EngagementState::Finalized {
        return Err(ServiceError::InvalidEngagementState(
            engagement.id,
            engagement.state,
        ));
    }
    Ok(())
}

impl ReportService {
    pub fn new(db_client: Arc<DBClient>, admin_recipient_id: Uuid) -> Self {
        Self {
            db_client,
            admin_recipient_id,
        }
    }

    /// Files a report against the provider of a finalized engagement. The
    /// report row and the admin alert commit together.
    pub async fn file_report(
        &self,
        engagement_id: Uuid,
        reporter_id: Uuid,
        motive: String,
        description: String,
    ) -> Result<Report, ServiceError> {
        let engagement = self
            .db_client
            .get_engagement_by_id(engagement_id)
            .await?
            .ok_or(ServiceError::EngagementNotFound(engagement_id))?;

        ensure_reportable(&engagement, reporter_id)?;

        let description = ammonia::clean(&description);
        let motive = ammonia::clean(&motive);

        let mut tx = self.db_client.pool.begin().await?;

        let report = self
            .db_client
            .create_report_tx(
                engagement_id,
                reporter_id,
                engagement.provider_id,
                &motive,
                &description,
                &mut tx,
            )
            .await?;

        self.db_client
            .insert_notification_tx(
                self.admin_recipient_id,
                NotificationKind::NewReport,
                Some(engagement_id),
                &format!(
                    "A new report was filed against provider {}.",
                    engagement.provider_id
                ),
                &mut tx,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "report {} filed against provider {} for engagement {}",
            report.id,
            engagement.provider_id,
            engagement_id
        );

        Ok(report)
    }

    pub async fn list_reports(
        &self,
        status: Option<ReportStatus>,
    ) -> Result<Vec<Report>, ServiceError> {
        Ok(self.db_client.get_reports(status).await?)
    }

    pub async fn review_report(
        &self,
        report_id: Uuid,
        status: ReportStatus,
        admin_comment: Option<String>,
    ) -> Result<Report, ServiceError> {
        self.db_client
            .get_report_by_id(report_id)
            .await?
            .ok_or(ServiceError::ReportNotFound(report_id))?;

        let report = self
            .db_client
            .update_report_status(report_id, status, admin_comment)
            .await?;

        tracing::info!("report {} moved to {}", report.id, report.status.to_str());

        Ok(report)
    }
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
            agreement_confirmed: true,
            state,
            contacted_at: Utc::now(),
            agreement_confirmed_at: Some(Utc::now()),
            finalized_at: None,
            client_confirmed_finalized: false,
            client_confirmed_finalized_at: None,
        }
    }

    #[test]
    fn reports_require_a_finalized_engagement() {
        let engagement = engagement_in(EngagementState::Confirmed);
        assert!(matches!(
            ensure_reportable(&engagement, engagement.client_id),
            Err(ServiceError::InvalidEngagementState(_, _))
        ));

        let finalized = engagement_in(EngagementState::Finalized);
        assert!(ensure_reportable(&finalized, finalized.client_id).is_ok());
    }

    #[test]
    fn only_the_engagement_client_may_report() {
        let finalized = engagement_in(EngagementState::Finalized);
        assert!(matches!(
            ensure_reportable(&finalized, Uuid::new_v4()),
            Err(ServiceError::UnauthorizedEngagementAccess(_, _))
        ));
    }

    #[test]
    fn self_reports_always_fail() {
        let finalized = engagement_in(EngagementState::Finalized);
        assert!(matches!(
            ensure_reportable(&finalized, finalized.provider_id),
            Err(ServiceError::Forbidden(_))
        ));
    }
}
