//! Admin facade routes
//!
//! Dashboard counters, managed user accounts, comment moderation, and a
//! feedback view. Every route here requires ROLE_ADMIN.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, put},
};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AdminUser,
    models::admin::{AdminCreateUserRequest, AdminUpdateUserRequest, UpdateRoleRequest},
    models::comment::{CommentResponse, UpdateCommentRequest},
    models::feedback::{FeedbackListQuery, FeedbackListResponse},
    models::user::{Role, UserResponse},
    state::AppState,
    validation,
};

/// Create the router for the admin routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/users", get(get_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
        .route("/users/:id/role", put(update_user_role))
        .route("/comments", get(get_comments))
        .route("/comments/:id", put(update_comment).delete(delete_comment))
        .route("/feedback", get(get_feedback))
        .route("/feedback/stats", get(get_feedback_stats))
        .route("/feedback/:id", delete(delete_feedback))
}

/// Aggregate counters for the dashboard
pub async fn get_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<impl IntoResponse> {
    let stats = state.stats_repository.admin_stats().await.map_err(|e| {
        error!("Failed to compute admin stats: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(stats))
}

/// All user accounts
pub async fn get_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<impl IntoResponse> {
    let users = state.user_repository.get_all().await.map_err(|e| {
        error!("Failed to load users: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(
        users
            .into_iter()
            .map(UserResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Create a managed account with an explicit role set
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<AdminCreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_username(&payload.username).map_err(ApiError::BadRequest)?;
    validation::validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    validation::validate_password(&payload.password).map_err(ApiError::BadRequest)?;

    let roles = payload
        .roles
        .unwrap_or_else(|| vec![Role::User.as_str().to_string()]);
    Role::validate_all(&roles).map_err(ApiError::BadRequest)?;

    let username_taken = state
        .user_repository
        .username_exists(&payload.username)
        .await
        .map_err(|e| {
            error!("Failed to check username: {}", e);
            ApiError::InternalServerError
        })?;
    if username_taken {
        return Err(ApiError::Conflict("Username is already taken".to_string()));
    }

    let email_taken = state
        .user_repository
        .email_exists(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to check email: {}", e);
            ApiError::InternalServerError
        })?;
    if email_taken {
        return Err(ApiError::Conflict("Email is already in use".to_string()));
    }

    let password_hash = state.password_service.hash(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::InternalServerError
    })?;

    let user = state
        .user_repository
        .create_managed(
            &payload.username,
            &payload.email,
            &password_hash,
            &roles,
            payload.enabled.unwrap_or(true),
        )
        .await
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            ApiError::InternalServerError
        })?;

    info!("User {} created by admin {}", user.username, admin.username);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Update an account's name, email, enabled flag, or role set
pub async fn update_user(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    if let Some(roles) = payload.roles.as_deref() {
        Role::validate_all(roles).map_err(ApiError::BadRequest)?;
    }

    let current = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if let Some(email) = payload.email.as_deref() {
        validation::validate_email(email).map_err(ApiError::BadRequest)?;
        if email != current.email {
            let taken = state.user_repository.email_exists(email).await.map_err(|e| {
                error!("Failed to check email: {}", e);
                ApiError::InternalServerError
            })?;
            if taken {
                return Err(ApiError::Conflict("Email is already in use".to_string()));
            }
        }
    }

    let user = state
        .user_repository
        .admin_update(
            id,
            payload.name.as_deref(),
            payload.email.as_deref(),
            payload.enabled,
            payload.roles.as_deref(),
        )
        .await
        .map_err(|e| {
            error!("Failed to update user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete an account. Rows the account authored keep their stale pointer.
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state.user_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete user: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!("User {} deleted by admin {}", id, admin.username);

    Ok(Json(json!({"message": "User deleted successfully"})))
}

/// Replace an account's role set with a single role
pub async fn update_user_role(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let role = Role::parse(&payload.role).map_err(ApiError::BadRequest)?;

    let user = state
        .user_repository
        .set_roles(id, &[role.as_str().to_string()])
        .await
        .map_err(|e| {
            error!("Failed to update roles: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// All comments across all achievements
pub async fn get_comments(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<impl IntoResponse> {
    let comments = state.comment_repository.get_all().await.map_err(|e| {
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

/// Replace a comment's text
pub async fn update_comment(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCommentRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_comment_text(&payload.text).map_err(ApiError::BadRequest)?;

    let comment = state
        .comment_repository
        .update_text(id, payload.text.trim())
        .await
        .map_err(|e| {
            error!("Failed to update comment: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    Ok(Json(CommentResponse::from(comment)))
}

/// Delete a comment
pub async fn delete_comment(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state.comment_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete comment: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    }

    Ok(Json(json!({"message": "Comment deleted successfully"})))
}

/// Paged feedback listing, same shape as the feedback module's own
pub async fn get_feedback(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<FeedbackListQuery>,
) -> ApiResult<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let sort_by = query.sort_by.as_deref().unwrap_or("createdAt");
    let direction = query.direction.as_deref().unwrap_or("desc");

    let (items, total) = state
        .feedback_repository
        .list(None, page, limit, sort_by, direction)
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

/// Feedback status counters and mean rating
pub async fn get_feedback_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<impl IntoResponse> {
    let stats = state.feedback_repository.stats().await.map_err(|e| {
        error!("Failed to compute feedback stats: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(stats))
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
