// handler/listing.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::listingdb::ListingExt,
    dtos::{listingdtos::CreateListingDto, ApiResponse},
    error::HttpError,
    handler::review::decode_images,
    middleware::JWTAuthMiddeware,
    models::{
        listingmodel::{Listing, ListingStatus, MAX_LISTING_IMAGES},
        usermodel::UserRole,
    },
    service::{review_service::extension_for, side_effect::best_effort},
    AppState,
};

pub fn listing_handler() -> Router {
    Router::new()
        .route("/", post(create_listing))
        .route("/provider/:provider_id", get(provider_listings))
        .route("/:listing_id", get(get_listing))
        .route("/:listing_id", delete(archive_listing))
}

#[derive(Debug, Serialize)]
pub struct ListingWithImages {
    #[serde(flatten)]
    pub listing: Listing,
    pub image_urls: Vec<String>,
}

pub async fn create_listing(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateListingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::unprocessable_entity(e.to_string()))?;

    if auth.user.role != UserRole::Provider {
        return Err(HttpError::forbidden("Only providers can publish listings"));
    }

    // Same policy as reviews: exceeding the cap rejects the whole request.
    if body.images.len() > MAX_LISTING_IMAGES {
        return Err(HttpError::unprocessable_entity(format!(
            "A listing can carry at most {} images, got {}",
            MAX_LISTING_IMAGES,
            body.images.len()
        )));
    }

    let images = decode_images(body.images)?;

    let mut image_keys = Vec::with_capacity(images.len());
    for image in images {
        let key = format!(
            "listings/{}.{}",
            Uuid::new_v4(),
            extension_for(&image.content_type)
        );
        let stored = app_state
            .storage
            .put(&key, image.bytes, &image.content_type)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()));

        match stored {
            Ok(stored_key) => image_keys.push(stored_key),
            Err(err) => {
                for key in &image_keys {
                    best_effort("listing image cleanup", app_state.storage.delete(key)).await;
                }
                return Err(err);
            }
        }
    }

    let (listing, images) = app_state
        .db_client
        .create_listing_with_images(
            auth.user.id,
            body.title,
            body.description,
            body.category,
            image_keys,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!(
        "listing {} created in category {}",
        listing.id,
        listing.category.to_str()
    );

    Ok(Json(ApiResponse::success(
        "Listing created successfully",
        serde_json::json!({ "listing": listing, "images": images }),
    )))
}

pub async fn get_listing(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(listing_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let listing = app_state
        .db_client
        .get_listing_by_id(listing_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Listing not found"))?;

    let images = app_state
        .db_client
        .get_listing_images(listing_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let mut image_urls = Vec::with_capacity(images.len());
    for image in &images {
        if let Some(url) = best_effort(
            "listing image presign",
            app_state
                .storage
                .temporary_url(&image.object_key, app_state.env.presign_ttl_secs),
        )
        .await
        {
            image_urls.push(url);
        }
    }

    Ok(Json(ApiResponse::success(
        "Listing retrieved successfully",
        ListingWithImages {
            listing,
            image_urls,
        },
    )))
}

pub async fn provider_listings(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(provider_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let listings = app_state
        .db_client
        .get_listings_for_provider(provider_id, ListingStatus::Active)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Listings retrieved successfully",
        listings,
    )))
}

pub async fn archive_listing(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(listing_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let listing = app_state
        .db_client
        .get_listing_by_id(listing_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Listing not found"))?;

    if listing.provider_id != auth.user.id {
        return Err(HttpError::forbidden("Listing belongs to another provider"));
    }

    let archived = app_state
        .db_client
        .archive_listing(listing_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Listing archived successfully",
        archived,
    )))
}
