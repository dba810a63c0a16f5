// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        engagement::engagement_handler,
        listing::listing_handler,
        notification_handler::notification_routes,
        payment::{payment_handler, payment_webhook_handler},
        provider::provider_handler,
        report::report_handler,
        review::review_handler,
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Billing: checkout requires auth, the webhook is called by Stripe.
    let billing_routes = Router::new()
        .merge(payment_handler().layer(middleware::from_fn(auth)))
        .merge(payment_webhook_handler());

    let api_route = Router::new()
        .nest(
            "/engagements",
            engagement_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/reviews", review_handler().layer(middleware::from_fn(auth)))
        .nest("/reports", report_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/notifications",
            notification_routes().layer(middleware::from_fn(auth)),
        )
        .nest("/listings", listing_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/providers",
            provider_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/billing", billing_routes)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
