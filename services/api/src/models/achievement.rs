//! Achievement model and feed projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::AuthorSummary;

/// Achievement entity
#[derive(Debug, Clone, FromRow)]
pub struct Achievement {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
}

/// Feed projection: the achievement plus the viewer-specific hasLiked flag
/// and the author, when the author account still exists. hasLiked is always
/// false for anonymous viewers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub likes: i32,
    pub has_liked: bool,
    pub created_at: DateTime<Utc>,
    pub author: Option<AuthorSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAchievementRequest {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAchievementRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

/// Outcome of a like or unlike, echoing the current counter
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub likes: i32,
    pub has_liked: bool,
}
