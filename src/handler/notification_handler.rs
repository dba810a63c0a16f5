// handler/notification_handler.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    db::notificationdb::NotificationExt,
    dtos::{engagementdtos::PaginationParams, notificationdtos::MarkReadRequest, ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn notification_routes() -> Router {
    Router::new()
        .route("/", get(get_user_notifications))
        .route("/unread-count", get(get_unread_count))
        .route("/read", post(mark_notifications_read))
        .route("/read-all", post(mark_all_notifications_read))
        .route("/:id/read", put(mark_single_notification_read))
}

pub async fn get_user_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, HttpError> {
    let page = pagination.page.unwrap_or(1).max(1);
    let limit = pagination.limit.unwrap_or(20).min(100) as i64;
    let offset = ((page - 1) as i64) * limit;

    let notifications = app_state
        .notification_service
        .list_for_user(auth.user.id, limit, offset)
        .await?;

    Ok(Json(ApiResponse::success(
        "Notifications retrieved successfully",
        notifications,
    )))
}

pub async fn get_unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let count = app_state
        .notification_service
        .unread_count(auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Unread count retrieved successfully",
        serde_json::json!({ "unread_count": count }),
    )))
}

async fn mark_one_owned(
    app_state: &AppState,
    auth: &JWTAuthMiddeware,
    notification_id: Uuid,
) -> Result<(), HttpError> {
    let notification = app_state
        .db_client
        .get_notification_by_id(notification_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Notification not found"))?;

    if notification.recipient_id != auth.user.id {
        return Err(HttpError::forbidden(
            "Notification belongs to another user",
        ));
    }

    app_state
        .notification_service
        .mark_read(notification_id)
        .await?;

    Ok(())
}

pub async fn mark_notifications_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(payload): Json<MarkReadRequest>,
) -> Result<impl IntoResponse, HttpError> {
    if let Some(notification_ids) = payload.notification_ids {
        for notification_id in notification_ids {
            mark_one_owned(&app_state, &auth, notification_id).await?;
        }
    }

    Ok(Json(ApiResponse::success(
        "Notifications marked as read",
        serde_json::json!({}),
    )))
}

pub async fn mark_all_notifications_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let updated = app_state
        .notification_service
        .mark_all_read(auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "All notifications marked as read",
        serde_json::json!({ "updated_count": updated }),
    )))
}

pub async fn mark_single_notification_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    mark_one_owned(&app_state, &auth, notification_id).await?;

    Ok(Json(ApiResponse::success(
        "Notification marked as read",
        serde_json::json!({}),
    )))
}
