//! User profile and social graph routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, can_modify},
    models::user::{UpdatePictureRequest, UpdateUserRequest, UserResponse},
    state::AppState,
};

const SEARCH_LIMIT: i64 = 10;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Create the router for the user routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/search", get(search_users))
        .route("/username/:username", get(get_user_by_username))
        .route("/:id", get(get_user).put(update_user))
        .route("/:id/picture", put(update_picture))
        .route("/:id/follow", post(follow_user).delete(unfollow_user))
        .route("/:id/followers", get(get_followers))
        .route("/:id/following", get(get_following))
        .route("/:id/is-following", get(is_following))
}

/// Get all users
pub async fn get_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let users = state.user_repository.get_all().await.map_err(|e| {
        error!("Failed to get users: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(
        users.into_iter().map(UserResponse::from).collect::<Vec<_>>(),
    ))
}

/// Substring search over usernames and display names
pub async fn search_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let term = query.q.unwrap_or_default();
    if term.trim().is_empty() {
        return Ok(Json(Vec::<UserResponse>::new()));
    }

    let users = state
        .user_repository
        .search(term.trim(), SEARCH_LIMIT)
        .await
        .map_err(|e| {
            error!("Failed to search users: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(
        users.into_iter().map(UserResponse::from).collect::<Vec<_>>(),
    ))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Get a user by username
pub async fn get_user_by_username(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_username(&username)
        .await
        .map_err(|e| {
            error!("Failed to get user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Self-service profile update, also open to admins. The username can only
/// change on local accounts; the email never changes here.
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    if !can_modify(&auth, id) {
        return Err(ApiError::Forbidden);
    }

    let target = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let mut new_username: Option<&str> = None;
    if let Some(username) = payload.username.as_deref() {
        if username != target.username {
            if !target.is_local() {
                return Err(ApiError::BadRequest(
                    "Username cannot be changed for federated accounts".to_string(),
                ));
            }
            let taken = state
                .user_repository
                .username_exists(username)
                .await
                .map_err(|e| {
                    error!("Failed to check username: {}", e);
                    ApiError::InternalServerError
                })?;
            if taken {
                return Err(ApiError::Conflict("Username is already taken".to_string()));
            }
            new_username = Some(username);
        }
    }

    let user = state
        .user_repository
        .update_profile(
            id,
            new_username,
            payload.name.as_deref(),
            payload.picture.as_deref(),
        )
        .await
        .map_err(|e| {
            error!("Failed to update user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Replace the profile picture
pub async fn update_picture(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePictureRequest>,
) -> ApiResult<impl IntoResponse> {
    if !can_modify(&auth, id) {
        return Err(ApiError::Forbidden);
    }

    let user = state
        .user_repository
        .update_picture(id, &payload.picture)
        .await
        .map_err(|e| {
            error!("Failed to update picture: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Follow a user; the actor is always the request principal
pub async fn follow_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if auth.id == id {
        return Err(ApiError::UnprocessableEntity(
            "You cannot follow yourself".to_string(),
        ));
    }

    let target_exists = state.user_repository.find_by_id(id).await.map_err(|e| {
        error!("Failed to load user: {}", e);
        ApiError::InternalServerError
    })?;
    if target_exists.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    state.user_repository.follow(auth.id, id).await.map_err(|e| {
        error!("Failed to follow user: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(json!({"following": true})))
}

/// Unfollow a user; repeat calls are no-ops
pub async fn unfollow_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if auth.id == id {
        return Err(ApiError::UnprocessableEntity(
            "You cannot unfollow yourself".to_string(),
        ));
    }

    state
        .user_repository
        .unfollow(auth.id, id)
        .await
        .map_err(|e| {
            error!("Failed to unfollow user: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({"following": false})))
}

/// Users following the given user
pub async fn get_followers(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    ensure_user_exists(&state, id).await?;

    let users = state.user_repository.followers_of(id).await.map_err(|e| {
        error!("Failed to get followers: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(
        users.into_iter().map(UserResponse::from).collect::<Vec<_>>(),
    ))
}

/// Users the given user follows
pub async fn get_following(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    ensure_user_exists(&state, id).await?;

    let users = state.user_repository.following_of(id).await.map_err(|e| {
        error!("Failed to get following: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(
        users.into_iter().map(UserResponse::from).collect::<Vec<_>>(),
    ))
}

/// Whether the principal follows the given user
pub async fn is_following(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let following = state
        .user_repository
        .is_following(auth.id, id)
        .await
        .map_err(|e| {
            error!("Failed to check follow state: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({"following": following})))
}

async fn ensure_user_exists(state: &AppState, id: Uuid) -> Result<(), ApiError> {
    let exists = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load user: {}", e);
            ApiError::InternalServerError
        })?
        .is_some();

    if exists {
        Ok(())
    } else {
        Err(ApiError::NotFound("User not found".to_string()))
    }
}
