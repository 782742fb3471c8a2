//! Course catalog routes
//!
//! Reads require authentication; create, update, and delete are admin-only.
//! Ratings live under the course they score.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AdminUser, AuthUser},
    models::course::{
        CourseResponse, CourseWithTasksResponse, CreateCourseRequest, UpdateCourseRequest,
    },
    models::rating::{RateCourseRequest, RatingResponse},
    models::task::TaskResponse,
    state::AppState,
    validation,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub instructor_id: Option<Uuid>,
    pub published: Option<bool>,
}

/// Create the router for the course routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_courses).post(create_course))
        .route(
            "/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/:id/with-tasks", get(get_course_with_tasks))
        .route("/:id/ratings", get(get_ratings).post(rate_course))
}

/// Course listing with optional filters, one at a time
pub async fn get_courses(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<CourseListQuery>,
) -> ApiResult<impl IntoResponse> {
    let courses = if let Some(term) = query.search.as_deref() {
        state.course_repository.search_by_title(term).await
    } else if let Some(category) = query.category.as_deref() {
        state.course_repository.list_by_category(category).await
    } else if let Some(instructor_id) = query.instructor_id {
        state.course_repository.list_by_instructor(instructor_id).await
    } else if query.published == Some(true) {
        state.course_repository.list_published().await
    } else {
        state.course_repository.get_all().await
    }
    .map_err(|e| {
        error!("Failed to load courses: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(
        courses
            .into_iter()
            .map(CourseResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Create a course; an inline task list becomes its template
pub async fn create_course(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<CreateCourseRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }

    let course = state.course_repository.create(&payload).await.map_err(|e| {
        error!("Failed to create course: {}", e);
        ApiError::InternalServerError
    })?;

    let tasks = match payload.tasks.as_deref() {
        Some(template) if !template.is_empty() => state
            .task_repository
            .replace_templates(course.id, template)
            .await
            .map_err(|e| {
                error!("Failed to create template tasks: {}", e);
                ApiError::InternalServerError
            })?,
        _ => Vec::new(),
    };

    Ok((
        StatusCode::CREATED,
        Json(CourseWithTasksResponse {
            course: course.into(),
            tasks: tasks.into_iter().map(TaskResponse::from).collect(),
        }),
    ))
}

/// Get a course by ID
pub async fn get_course(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let course = state
        .course_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load course: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    Ok(Json(CourseResponse::from(course)))
}

/// Course alongside its template tasks
pub async fn get_course_with_tasks(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let course = state
        .course_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load course: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let tasks = state
        .task_repository
        .templates_for_course(id)
        .await
        .map_err(|e| {
            error!("Failed to load template tasks: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(CourseWithTasksResponse {
        course: course.into(),
        tasks: tasks.into_iter().map(TaskResponse::from).collect(),
    }))
}

/// Update a course; a task list in the payload replaces the template rows
/// wholesale, leaving materialized per-user rows untouched.
pub async fn update_course(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> ApiResult<impl IntoResponse> {
    let course = state
        .course_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update course: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let tasks = match payload.tasks.as_deref() {
        Some(template) => state
            .task_repository
            .replace_templates(id, template)
            .await
            .map_err(|e| {
                error!("Failed to replace template tasks: {}", e);
                ApiError::InternalServerError
            })?,
        None => state.task_repository.templates_for_course(id).await.map_err(|e| {
            error!("Failed to load template tasks: {}", e);
            ApiError::InternalServerError
        })?,
    };

    Ok(Json(CourseWithTasksResponse {
        course: course.into(),
        tasks: tasks.into_iter().map(TaskResponse::from).collect(),
    }))
}

/// Delete a course with its tasks and ratings
pub async fn delete_course(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state.course_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete course: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    Ok(Json(json!({"message": "Course deleted successfully"})))
}

/// Rate a course; a second rating from the same user replaces the first
pub async fn rate_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RateCourseRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_rating(payload.stars).map_err(ApiError::BadRequest)?;

    let exists = state.course_repository.exists(id).await.map_err(|e| {
        error!("Failed to check course: {}", e);
        ApiError::InternalServerError
    })?;
    if !exists {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let rating = state
        .rating_repository
        .rate(id, auth.id, payload.stars)
        .await
        .map_err(|e| {
            error!("Failed to rate course: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(RatingResponse::from(rating)))
}

/// All ratings for a course
pub async fn get_ratings(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let exists = state.course_repository.exists(id).await.map_err(|e| {
        error!("Failed to check course: {}", e);
        ApiError::InternalServerError
    })?;
    if !exists {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let ratings = state
        .rating_repository
        .list_for_course(id)
        .await
        .map_err(|e| {
            error!("Failed to load ratings: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(
        ratings
            .into_iter()
            .map(RatingResponse::from)
            .collect::<Vec<_>>(),
    ))
}
