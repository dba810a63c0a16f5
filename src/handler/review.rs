// handler/review.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::reviewdb::ReviewExt,
    dtos::{
        reviewdtos::{ImageUploadDto, SubmitReviewDto},
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::reviewmodel::ReviewScores,
    service::review_service::ImageUpload,
    AppState,
};

pub fn review_handler() -> Router {
    Router::new()
        .route("/", post(submit_review))
        .route("/client", get(client_reviews))
        .route("/provider/:provider_id", get(provider_reviews))
        .route("/engagement/:engagement_id", get(engagement_review))
}

pub(crate) fn decode_images(dtos: Vec<ImageUploadDto>) -> Result<Vec<ImageUpload>, HttpError> {
    dtos.into_iter()
        .map(|dto| {
            let bytes = STANDARD
                .decode(dto.data_base64.as_bytes())
                .map_err(|_| HttpError::unprocessable_entity("Image data is not valid base64"))?;
            Ok(ImageUpload {
                bytes,
                content_type: dto.content_type,
            })
        })
        .collect()
}

pub async fn submit_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<SubmitReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::unprocessable_entity(e.to_string()))?;

    let scores = ReviewScores {
        general: body.general_score,
        punctuality: body.punctuality_score,
        quality: body.quality_score,
        value: body.value_score,
    };

    let images = decode_images(body.images)?;

    let result = app_state
        .review_service
        .submit_review(
            body.engagement_id,
            auth.user.id,
            scores,
            body.comment,
            body.recommendation,
            images,
        )
        .await?;

    Ok(Json(ApiResponse::success(
        "Review created successfully",
        result,
    )))
}

pub async fn client_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let reviews = app_state
        .review_service
        .reviews_by_client(auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Client reviews retrieved successfully",
        reviews,
    )))
}

pub async fn provider_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(provider_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let reviews = app_state
        .review_service
        .reviews_for_provider(provider_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Provider reviews retrieved successfully",
        reviews,
    )))
}

/// The single review attached to an engagement, if any.
pub async fn engagement_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(engagement_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let review = app_state
        .db_client
        .get_review_by_engagement(engagement_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("No review exists for this engagement"))?;

    Ok(Json(ApiResponse::success(
        "Review retrieved successfully",
        review,
    )))
}
