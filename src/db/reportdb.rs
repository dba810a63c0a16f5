// db/reportdb.rs
use async_trait::async_trait;
use sqlx::{Error, Postgres, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::reportmodel::{Report, ReportStatus};

const REPORT_COLUMNS: &str = r#"
    id, engagement_id, reporter_id, provider_id,
    motive, description, status, reported_at, reviewed_at, admin_comment
"#;

#[async_trait]
pub trait ReportExt {
    async fn create_report_tx(
        &self,
        engagement_id: Uuid,
        reporter_id: Uuid,
        provider_id: Uuid,
        motive: &str,
        description: &str,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Report, Error>;

    async fn get_report_by_id(&self, report_id: Uuid) -> Result<Option<Report>, Error>;

    async fn get_reports(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, Error>;

    async fn update_report_status(
        &self,
        report_id: Uuid,
        status: ReportStatus,
        admin_comment: Option<String>,
    ) -> Result<Report, Error>;
}

#[async_trait]
impl ReportExt for DBClient {
    async fn create_report_tx(
        &self,
        engagement_id: Uuid,
        reporter_id: Uuid,
        provider_id: Uuid,
        motive: &str,
        description: &str,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Report, Error> {
        sqlx::query_as::<_, Report>(&format!(
            r#"
            INSERT INTO reports (engagement_id, reporter_id, provider_id, motive, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(engagement_id)
        .bind(reporter_id)
        .bind(provider_id)
        .bind(motive)
        .bind(description)
        .fetch_one(&mut **tx)
        .await
    }

    async fn get_report_by_id(&self, report_id: Uuid) -> Result<Option<Report>, Error> {
        sqlx::query_as::<_, Report>(&format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM reports
            WHERE id = $1
            "#
        ))
        .bind(report_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_reports(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, Error> {
        match status {
            Some(status) => {
                sqlx::query_as::<_, Report>(&format!(
                    r#"
                    SELECT {REPORT_COLUMNS}
                    FROM reports
                    WHERE status = $1
                    ORDER BY reported_at DESC
                    "#
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Report>(&format!(
                    r#"
                    SELECT {REPORT_COLUMNS}
                    FROM reports
                    ORDER BY reported_at DESC
                    "#
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    async fn update_report_status(
        &self,
        report_id: Uuid,
        status: ReportStatus,
        admin_comment: Option<String>,
    ) -> Result<Report, Error> {
        sqlx::query_as::<_, Report>(&format!(
            r#"
            UPDATE reports
            SET status = $2,
                admin_comment = COALESCE($3, admin_comment),
                reviewed_at = NOW()
            WHERE id = $1
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(report_id)
        .bind(status)
        .bind(admin_comment)
        .fetch_one(&self.pool)
        .await
    }
}
