//! Media metadata routes
//!
//! Bytes never pass through here; clients upload to the external host and
//! register the resulting public ID and URL afterwards.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, can_modify},
    models::media::{CreateMediaRequest, MediaResponse},
    state::AppState,
    validation,
};

/// Create the router for the media routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_media_items).post(create_media))
        .route("/user/:user_id", get(get_media_by_user))
        .route("/:id", get(get_media).delete(delete_media))
}

/// Register metadata for a completed upload
pub async fn create_media(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateMediaRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.public_id.trim().is_empty() {
        return Err(ApiError::BadRequest("Public ID is required".to_string()));
    }
    if payload.url.trim().is_empty() {
        return Err(ApiError::BadRequest("URL is required".to_string()));
    }
    validation::validate_media_type(&payload.media_type).map_err(ApiError::BadRequest)?;

    let media = state
        .media_repository
        .create(auth.id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to create media: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(MediaResponse::from(media))))
}

/// All media items
pub async fn get_media_items(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let items = state.media_repository.get_all().await.map_err(|e| {
        error!("Failed to load media: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(
        items
            .into_iter()
            .map(MediaResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Media registered by one user
pub async fn get_media_by_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let items = state
        .media_repository
        .list_by_user(user_id)
        .await
        .map_err(|e| {
            error!("Failed to load media: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(
        items
            .into_iter()
            .map(MediaResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Get a media item by ID
pub async fn get_media(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let media = state
        .media_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load media: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Media not found".to_string()))?;

    Ok(Json(MediaResponse::from(media)))
}

/// Delete a media item; uploader or admin
pub async fn delete_media(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let media = state
        .media_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load media: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Media not found".to_string()))?;

    if !can_modify(&auth, media.uploaded_by) {
        return Err(ApiError::Forbidden);
    }

    state.media_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete media: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(json!({"message": "Media deleted successfully"})))
}
