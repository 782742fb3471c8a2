//! Task routes
//!
//! Template rows are managed by admins; the completed flag on a
//! materialized row can only be flipped by the user who owns it.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AdminUser, AuthUser},
    models::task::{
        CreateTaskRequest, TaskResponse, TaskStatusRequest, TemplateTaskRequest, UpdateTaskRequest,
    },
    state::AppState,
};

/// Create the router for the task routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_task))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
        .route("/:id/status", patch(set_task_status))
}

/// Create a template task for a course
pub async fn create_task(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }

    let exists = state
        .course_repository
        .exists(payload.course_id)
        .await
        .map_err(|e| {
            error!("Failed to check course: {}", e);
            ApiError::InternalServerError
        })?;
    if !exists {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let template = TemplateTaskRequest {
        title: payload.title,
        description: payload.description,
        order_index: payload.order_index,
        due_date: payload.due_date,
    };

    let task = state
        .task_repository
        .create_template(payload.course_id, &template)
        .await
        .map_err(|e| {
            error!("Failed to create task: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// Get a task by ID
pub async fn get_task(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let task = state
        .task_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load task: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse::from(task)))
}

/// Update a template task
pub async fn update_task(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    let task = state
        .task_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load task: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if task.user_id.is_some() {
        return Err(ApiError::BadRequest(
            "Only template tasks can be updated".to_string(),
        ));
    }

    let updated = state
        .task_repository
        .update_template(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update task: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse::from(updated)))
}

/// Delete a template task
pub async fn delete_task(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let task = state
        .task_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load task: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if task.user_id.is_some() {
        return Err(ApiError::BadRequest(
            "Only template tasks can be deleted".to_string(),
        ));
    }

    let deleted = state.task_repository.delete_template(id).await.map_err(|e| {
        error!("Failed to delete task: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(json!({"message": "Task deleted successfully"})))
}

/// Flip the completed flag on one of the caller's materialized tasks.
/// Template rows carry no completion state, so they are rejected outright.
pub async fn set_task_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TaskStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let task = state
        .task_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load task: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    match task.user_id {
        Some(owner) if owner == auth.id => {}
        _ => return Err(ApiError::Forbidden),
    }

    let updated = state
        .task_repository
        .set_completed(id, payload.completed)
        .await
        .map_err(|e| {
            error!("Failed to update task status: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse::from(updated)))
}
