// handler/report.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        reportdtos::{FileReportDto, ReportFilterParams, ReviewReportDto},
        ApiResponse,
    },
    error::HttpError,
    middleware::{require_admin, JWTAuthMiddeware},
    AppState,
};

pub fn report_handler() -> Router {
    Router::new()
        .route("/", post(file_report))
        .route("/", get(list_reports))
        .route("/:report_id/review", put(review_report))
}

pub async fn file_report(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<FileReportDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::unprocessable_entity(e.to_string()))?;

    let report = app_state
        .report_service
        .file_report(body.engagement_id, auth.user.id, body.motive, body.description)
        .await?;

    Ok(Json(ApiResponse::success(
        "Report filed successfully",
        report,
    )))
}

pub async fn list_reports(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(filter): Query<ReportFilterParams>,
) -> Result<impl IntoResponse, HttpError> {
    require_admin(&auth)?;

    let reports = app_state.report_service.list_reports(filter.status).await?;

    Ok(Json(ApiResponse::success(
        "Reports retrieved successfully",
        reports,
    )))
}

pub async fn review_report(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(report_id): Path<Uuid>,
    Json(body): Json<ReviewReportDto>,
) -> Result<impl IntoResponse, HttpError> {
    require_admin(&auth)?;

    let report = app_state
        .report_service
        .review_report(report_id, body.status, body.admin_comment)
        .await?;

    Ok(Json(ApiResponse::success(
        "Report updated successfully",
        report,
    )))
}
