//! Feedback routes
//!
//! Users submit and amend their own entries; the review workflow
//! (status changes, listings across users, stats) is admin-only.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AdminUser, AuthUser, can_modify},
    models::feedback::{
        CreateFeedbackRequest, FeedbackListQuery, FeedbackListResponse, FeedbackStatus,
        UpdateFeedbackRequest, UpdateFeedbackStatusRequest,
    },
    state::AppState,
    validation,
};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

/// Create the router for the feedback routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_feedback).get(list_feedback))
        .route("/my-feedback", get(my_feedback))
        .route("/stats", get(feedback_stats))
        .route("/status/:status", get(list_feedback_by_status))
        .route(
            "/:id",
            get(get_feedback).put(update_feedback).delete(delete_feedback),
        )
        .route("/:id/status", put(update_feedback_status))
}

fn page_params(query: &FeedbackListQuery) -> (u32, u32, String, String) {
    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let sort_by = query
        .sort_by
        .clone()
        .unwrap_or_else(|| "createdAt".to_string());
    let direction = query.direction.clone().unwrap_or_else(|| "desc".to_string());
    (page, limit, sort_by, direction)
}

/// Submit feedback; every new entry starts out PENDING
pub async fn create_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateFeedbackRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }
    if payload.feedback_type.trim().is_empty() {
        return Err(ApiError::BadRequest("Type is required".to_string()));
    }
    validation::validate_rating(payload.rating).map_err(ApiError::BadRequest)?;

    let feedback = state
        .feedback_repository
        .create(auth.id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to create feedback: {}", e);
            ApiError::InternalServerError
        })?;

    info!("Feedback {} submitted by {}", feedback.id, auth.username);

    let response = state
        .feedback_repository
        .find_projected(feedback.id)
        .await
        .map_err(|e| {
            error!("Failed to load feedback: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::InternalServerError)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Paged listing over all feedback
pub async fn list_feedback(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<FeedbackListQuery>,
) -> ApiResult<impl IntoResponse> {
    let (page, limit, sort_by, direction) = page_params(&query);

    let (items, total) = state
        .feedback_repository
        .list(None, page, limit, &sort_by, &direction)
        .await
        .map_err(|e| {
            error!("Failed to list feedback: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(FeedbackListResponse {
        items,
        page,
        limit,
        total,
    }))
}

/// Paged listing restricted to one status
pub async fn list_feedback_by_status(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(status): Path<String>,
    Query(query): Query<FeedbackListQuery>,
) -> ApiResult<impl IntoResponse> {
    let status = FeedbackStatus::parse(&status).map_err(ApiError::BadRequest)?;
    let (page, limit, sort_by, direction) = page_params(&query);

    let (items, total) = state
        .feedback_repository
        .list(Some(status.as_str()), page, limit, &sort_by, &direction)
        .await
        .map_err(|e| {
            error!("Failed to list feedback: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(FeedbackListResponse {
        items,
        page,
        limit,
        total,
    }))
}

/// The caller's own feedback entries
pub async fn my_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let items = state
        .feedback_repository
        .list_by_user(auth.id)
        .await
        .map_err(|e| {
            error!("Failed to list feedback: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(items))
}

/// Get a feedback entry; submitters see their own, admins see all
pub async fn get_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let response = state
        .feedback_repository
        .find_projected(id)
        .await
        .map_err(|e| {
            error!("Failed to load feedback: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;

    if !can_modify(&auth, response.user_id) {
        return Err(ApiError::Forbidden);
    }

    Ok(Json(response))
}

/// Amend a feedback entry's content; owner or admin
pub async fn update_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFeedbackRequest>,
) -> ApiResult<impl IntoResponse> {
    if let Some(rating) = payload.rating {
        validation::validate_rating(rating).map_err(ApiError::BadRequest)?;
    }

    let feedback = state
        .feedback_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load feedback: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;

    if !can_modify(&auth, feedback.user_id) {
        return Err(ApiError::Forbidden);
    }

    state
        .feedback_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update feedback: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;

    let response = state
        .feedback_repository
        .find_projected(id)
        .await
        .map_err(|e| {
            error!("Failed to load feedback: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;

    Ok(Json(response))
}

/// Move an entry through the review workflow
pub async fn update_feedback_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFeedbackStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let status = FeedbackStatus::parse_transition(&payload.status).map_err(ApiError::BadRequest)?;

    state
        .feedback_repository
        .set_status(id, status.as_str(), payload.admin_response.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to update feedback status: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;

    info!(
        "Feedback {} moved to {} by {}",
        id,
        status.as_str(),
        admin.username
    );

    let response = state
        .feedback_repository
        .find_projected(id)
        .await
        .map_err(|e| {
            error!("Failed to load feedback: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;

    Ok(Json(response))
}

/// Delete a feedback entry
pub async fn delete_feedback(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state.feedback_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete feedback: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Feedback not found".to_string()));
    }

    Ok(Json(json!({"message": "Feedback deleted successfully"})))
}

/// Counts per status and the mean rating
pub async fn feedback_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<impl IntoResponse> {
    let stats = state.feedback_repository.stats().await.map_err(|e| {
        error!("Failed to compute feedback stats: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(stats))
}
