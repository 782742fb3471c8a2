//! Course model and catalog projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::task::{TaskResponse, TemplateTaskRequest};

/// Course entity. Rating aggregates are denormalized and recalculated
/// whenever a rating is written.
#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub instructor_id: Option<Uuid>,
    pub is_published: bool,
    pub rating_count: i32,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub instructor_id: Option<Uuid>,
    pub is_published: bool,
    pub rating_count: i32,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        CourseResponse {
            id: course.id,
            title: course.title,
            description: course.description,
            thumbnail_url: course.thumbnail_url,
            price: course.price,
            category: course.category,
            tags: course.tags,
            instructor_id: course.instructor_id,
            is_published: course.is_published,
            rating_count: course.rating_count,
            average_rating: course.average_rating,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

/// Course creation payload. An inline task list becomes the course template.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub instructor_id: Option<Uuid>,
    #[serde(default)]
    pub is_published: bool,
    pub tasks: Option<Vec<TemplateTaskRequest>>,
}

/// Course update payload. When a task list is present, it replaces the
/// template rows wholesale; materialized per-user rows are untouched.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub instructor_id: Option<Uuid>,
    pub is_published: Option<bool>,
    pub tasks: Option<Vec<TemplateTaskRequest>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseWithTasksResponse {
    pub course: CourseResponse,
    pub tasks: Vec<TaskResponse>,
}
