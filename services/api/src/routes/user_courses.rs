//! Per-user course routes
//!
//! The first task fetch for a course copies its template into per-user
//! rows; every later fetch returns those rows as they are.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::task::TaskResponse,
    state::AppState,
};

/// Create the router for the per-user course routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:course_id/tasks", get(get_user_tasks))
        .route("/:course_id/progress", get(get_progress))
}

/// The caller's tasks for a course, materializing the template on first access
pub async fn get_user_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let exists = state.course_repository.exists(course_id).await.map_err(|e| {
        error!("Failed to check course: {}", e);
        ApiError::InternalServerError
    })?;
    if !exists {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let tasks = state
        .task_repository
        .tasks_for_user(course_id, auth.id)
        .await
        .map_err(|e| {
            error!("Failed to load user tasks: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(
        tasks
            .into_iter()
            .map(TaskResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Completion percentage over the caller's tasks for a course, as a bare number
pub async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let exists = state.course_repository.exists(course_id).await.map_err(|e| {
        error!("Failed to check course: {}", e);
        ApiError::InternalServerError
    })?;
    if !exists {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let progress = state
        .task_repository
        .progress(course_id, auth.id)
        .await
        .map_err(|e| {
            error!("Failed to compute progress: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(progress))
}
