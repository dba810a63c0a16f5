// handler/payment.rs
use std::sync::Arc;

use axum::{
    body::Bytes,
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::{
    db::subscriptiondb::SubscriptionExt,
    dtos::{providerdtos::CreateCheckoutDto, ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::subscriptionmodel::SubscriptionStatus,
    AppState,
};

pub fn payment_handler() -> Router {
    Router::new()
        .route("/checkout", post(create_checkout))
        .route("/subscription", get(active_subscription))
}

pub fn payment_webhook_handler() -> Router {
    Router::new().route("/webhook/stripe", post(stripe_webhook))
}

pub async fn create_checkout(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateCheckoutDto>,
) -> Result<impl IntoResponse, HttpError> {
    let session = app_state
        .payment_service
        .create_checkout(
            auth.user.id,
            &body.plan_id,
            &body.success_url,
            &body.cancel_url,
        )
        .await?;

    Ok(Json(ApiResponse::success(
        "Checkout session created successfully",
        session,
    )))
}

pub async fn active_subscription(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let subscription = app_state
        .db_client
        .get_subscription_for_user(auth.user.id, SubscriptionStatus::Active)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("No active subscription"))?;

    Ok(Json(ApiResponse::success(
        "Subscription retrieved successfully",
        subscription,
    )))
}

pub async fn stripe_webhook(
    Extension(app_state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| HttpError::bad_request("Missing Stripe-Signature header"))?;

    let subscription = app_state
        .payment_service
        .handle_webhook(&body, signature)
        .await?;

    Ok(Json(ApiResponse::success(
        "Webhook processed",
        serde_json::json!({ "subscription": subscription }),
    )))
}
