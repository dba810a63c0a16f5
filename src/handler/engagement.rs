// handler/engagement.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    dtos::{
        engagementdtos::{ContactProviderDto, HireOutcomeDto},
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::usermodel::UserRole,
    AppState,
};

pub fn engagement_handler() -> Router {
    Router::new()
        .route("/contact", post(contact_provider))
        .route("/client", get(client_engagements))
        .route("/provider/active", get(provider_active_engagements))
        .route("/provider/history", get(provider_finalized_history))
        .route("/:engagement_id", get(get_engagement))
        .route("/:engagement_id/outcome", post(record_hire_outcome))
        .route("/:engagement_id/start", put(start_work))
        .route("/:engagement_id/finalize", put(finalize_engagement))
        .route("/:engagement_id/cancel", put(cancel_engagement))
        .route(
            "/:engagement_id/confirm-finalization",
            put(confirm_finalization),
        )
}

/// Client expresses interest in a provider, optionally tied to a listing.
pub async fn contact_provider(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<ContactProviderDto>,
) -> Result<impl IntoResponse, HttpError> {
    let engagement = app_state
        .engagement_service
        .record_contact(auth.user.id, body.provider_id, body.listing_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Contact recorded successfully",
        engagement,
    )))
}

pub async fn get_engagement(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(engagement_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let engagement = app_state
        .engagement_service
        .get_engagement(engagement_id)
        .await?;

    let is_participant =
        auth.user.id == engagement.client_id || auth.user.id == engagement.provider_id;
    if !is_participant && auth.user.role != UserRole::Admin {
        return Err(HttpError::forbidden(
            "You are not a participant of this engagement",
        ));
    }

    Ok(Json(ApiResponse::success(
        "Engagement retrieved successfully",
        engagement,
    )))
}

/// Client records whether the hire conversation led to an agreement.
pub async fn record_hire_outcome(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(engagement_id): Path<Uuid>,
    Json(body): Json<HireOutcomeDto>,
) -> Result<impl IntoResponse, HttpError> {
    let result = app_state
        .engagement_service
        .record_hire_outcome(engagement_id, auth.user.id, body.achieved)
        .await?;

    let message = if result.confirmed {
        "Agreement recorded successfully"
    } else {
        "Outcome feedback recorded"
    };

    Ok(Json(ApiResponse::success(message, result)))
}

pub async fn start_work(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(engagement_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let engagement = app_state
        .engagement_service
        .start_work(engagement_id, auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Work started successfully",
        engagement,
    )))
}

pub async fn finalize_engagement(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(engagement_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let engagement = app_state
        .engagement_service
        .finalize(engagement_id, auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Service finalized successfully",
        engagement,
    )))
}

pub async fn cancel_engagement(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(engagement_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let engagement = app_state
        .engagement_service
        .cancel(engagement_id, auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Engagement cancelled",
        engagement,
    )))
}

/// Client-side acknowledgment that the finalized work is accepted.
pub async fn confirm_finalization(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(engagement_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let engagement = app_state
        .engagement_service
        .confirm_client_finalization(engagement_id, auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Finalization confirmed",
        engagement,
    )))
}

pub async fn provider_active_engagements(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let engagements = app_state
        .engagement_service
        .active_engagements_for_provider(auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Active engagements retrieved successfully",
        engagements,
    )))
}

pub async fn provider_finalized_history(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let engagements = app_state
        .engagement_service
        .finalized_history_for_provider(auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Finalized history retrieved successfully",
        engagements,
    )))
}

pub async fn client_engagements(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let engagements = app_state
        .engagement_service
        .engagements_for_client(auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Client engagements retrieved successfully",
        engagements,
    )))
}
