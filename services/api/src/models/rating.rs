//! Course rating model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Rating entity; one row per (course, user), overwritten on re-rating
#[derive(Debug, Clone, FromRow)]
pub struct Rating {
    pub id: Uuid,
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub stars: i32,
    pub rated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub stars: i32,
    pub rated_at: DateTime<Utc>,
}

impl From<Rating> for RatingResponse {
    fn from(rating: Rating) -> Self {
        RatingResponse {
            id: rating.id,
            course_id: rating.course_id,
            user_id: rating.user_id,
            stars: rating.stars,
            rated_at: rating.rated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateCourseRequest {
    pub stars: i32,
}
