//! Achievement feed, like, and comment routes
//!
//! The feed and single reads are public; every viewer still gets a correct
//! hasLiked projection, which is simply false when anonymous.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, MaybeUser, can_modify},
    models::achievement::{CreateAchievementRequest, LikeResponse, UpdateAchievementRequest},
    models::comment::{CommentResponse, CreateCommentRequest},
    state::AppState,
    validation,
};

/// Create the router for the achievement routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_feed).post(create_achievement))
        .route("/user/:user_id", get(get_achievements_by_user))
        .route(
            "/:id",
            get(get_achievement)
                .put(update_achievement)
                .delete(delete_achievement),
        )
        .route("/:id/like", post(like_achievement).delete(unlike_achievement))
        .route("/:id/comments", get(get_comments).post(create_comment))
        .route("/comments/:comment_id", delete(delete_comment))
}

/// Full feed, newest first
pub async fn get_feed(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
) -> ApiResult<impl IntoResponse> {
    let feed = state
        .achievement_repository
        .feed(viewer.map(|user| user.id))
        .await
        .map_err(|e| {
            error!("Failed to load feed: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(feed))
}

/// Achievements authored by one user
pub async fn get_achievements_by_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let achievements = state
        .achievement_repository
        .list_by_author(user_id, Some(auth.id))
        .await
        .map_err(|e| {
            error!("Failed to load achievements: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(achievements))
}

/// Create a new achievement
pub async fn create_achievement(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAchievementRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }
    if payload.description.trim().is_empty() {
        return Err(ApiError::BadRequest("Description is required".to_string()));
    }

    let achievement = state
        .achievement_repository
        .create(auth.id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to create achievement: {}", e);
            ApiError::InternalServerError
        })?;

    let response = state
        .achievement_repository
        .find_projected(achievement.id, Some(auth.id))
        .await
        .map_err(|e| {
            error!("Failed to load achievement: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::InternalServerError)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Single achievement with the viewer's projection
pub async fn get_achievement(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let achievement = state
        .achievement_repository
        .find_projected(id, viewer.map(|user| user.id))
        .await
        .map_err(|e| {
            error!("Failed to load achievement: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Achievement not found".to_string()))?;

    Ok(Json(achievement))
}

/// Partial update, author or admin only
pub async fn update_achievement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAchievementRequest>,
) -> ApiResult<impl IntoResponse> {
    let achievement = state
        .achievement_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load achievement: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Achievement not found".to_string()))?;

    if !can_modify(&auth, achievement.author_id) {
        return Err(ApiError::Forbidden);
    }

    state
        .achievement_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update achievement: {}", e);
            ApiError::InternalServerError
        })?;

    let response = state
        .achievement_repository
        .find_projected(id, Some(auth.id))
        .await
        .map_err(|e| {
            error!("Failed to load achievement: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Achievement not found".to_string()))?;

    Ok(Json(response))
}

/// Delete an achievement, author or admin only
pub async fn delete_achievement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let achievement = state
        .achievement_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load achievement: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Achievement not found".to_string()))?;

    if !can_modify(&auth, achievement.author_id) {
        return Err(ApiError::Forbidden);
    }

    state.achievement_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete achievement: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(json!({"message": "Achievement deleted successfully"})))
}

/// Like an achievement; repeats are harmless
pub async fn like_achievement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let likes = state
        .achievement_repository
        .like(id, auth.id)
        .await
        .map_err(|e| {
            error!("Failed to like achievement: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Achievement not found".to_string()))?;

    Ok(Json(LikeResponse {
        likes,
        has_liked: true,
    }))
}

/// Remove a like; repeats are harmless
pub async fn unlike_achievement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let likes = state
        .achievement_repository
        .unlike(id, auth.id)
        .await
        .map_err(|e| {
            error!("Failed to unlike achievement: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Achievement not found".to_string()))?;

    Ok(Json(LikeResponse {
        likes,
        has_liked: false,
    }))
}

/// Comments on an achievement, newest first
pub async fn get_comments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let comments = state
        .comment_repository
        .list_for_achievement(id)
        .await
        .map_err(|e| {
            error!("Failed to load comments: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(
        comments
            .into_iter()
            .map(CommentResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Add a comment to an achievement
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_comment_text(&payload.text).map_err(ApiError::BadRequest)?;

    let exists = state.achievement_repository.exists(id).await.map_err(|e| {
        error!("Failed to check achievement: {}", e);
        ApiError::InternalServerError
    })?;
    if !exists {
        return Err(ApiError::NotFound("Achievement not found".to_string()));
    }

    // The snapshot needs the full author row
    let author = state
        .user_repository
        .find_by_id(auth.id)
        .await
        .map_err(|e| {
            error!("Failed to load author: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthorized)?;

    let comment = state
        .comment_repository
        .create(id, &author, payload.text.trim())
        .await
        .map_err(|e| {
            error!("Failed to create comment: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

/// Delete a comment, author or admin only
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let comment = state
        .comment_repository
        .find_by_id(comment_id)
        .await
        .map_err(|e| {
            error!("Failed to load comment: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    if !can_modify(&auth, comment.author_id) {
        return Err(ApiError::Forbidden);
    }

    state
        .comment_repository
        .delete(comment_id)
        .await
        .map_err(|e| {
            error!("Failed to delete comment: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({"message": "Comment deleted successfully"})))
}
