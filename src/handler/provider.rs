// handler/provider.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::providerdb::ProviderExt,
    dtos::{
        providerdtos::{ApplicationDecisionDto, ProviderApplicationDto},
        ApiResponse,
    },
    error::HttpError,
    handler::review::decode_images,
    middleware::{require_admin, JWTAuthMiddeware},
    AppState,
};

pub fn provider_handler() -> Router {
    Router::new()
        .route("/apply", post(apply_as_provider))
        .route("/applications", get(pending_applications))
        .route("/applications/:profile_id/decision", put(decide_application))
        .route("/:profile_id/photos", get(evidence_photos))
        .route("/me", get(own_profile))
}

pub async fn apply_as_provider(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<ProviderApplicationDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::unprocessable_entity(e.to_string()))?;

    let photos = decode_images(body.photos)?;

    let result = app_state
        .provider_service
        .apply(
            auth.user.id,
            body.display_name,
            body.specialties,
            body.experience_years,
            body.description,
            photos,
        )
        .await?;

    Ok(Json(ApiResponse::success(
        "Application submitted successfully",
        result,
    )))
}

pub async fn pending_applications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    require_admin(&auth)?;

    let applications = app_state.provider_service.pending_applications().await?;

    Ok(Json(ApiResponse::success(
        "Pending applications retrieved successfully",
        applications,
    )))
}

pub async fn decide_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(profile_id): Path<Uuid>,
    Json(body): Json<ApplicationDecisionDto>,
) -> Result<impl IntoResponse, HttpError> {
    require_admin(&auth)?;

    let decision = app_state
        .provider_service
        .decide(profile_id, body.approve)
        .await?;

    Ok(Json(ApiResponse::success(
        "Application decision applied",
        decision,
    )))
}

pub async fn evidence_photos(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let photos = app_state.provider_service.evidence_photos(profile_id).await?;

    Ok(Json(ApiResponse::success(
        "Evidence photos retrieved successfully",
        photos,
    )))
}

pub async fn own_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let profile = app_state
        .db_client
        .get_provider_profile(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Provider profile not found"))?;

    Ok(Json(ApiResponse::success(
        "Provider profile retrieved successfully",
        profile,
    )))
}
