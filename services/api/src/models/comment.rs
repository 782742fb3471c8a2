//! Comment model with embedded author snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Comment entity. The author columns are a snapshot taken when the comment
/// was written, so the comment stays renderable after the account is gone.
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub achievement_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_picture: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentAuthor {
    pub id: Uuid,
    pub username: String,
    pub picture: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub achievement_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author: CommentAuthor,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        CommentResponse {
            id: comment.id,
            achievement_id: comment.achievement_id,
            text: comment.text,
            created_at: comment.created_at,
            author: CommentAuthor {
                id: comment.author_id,
                username: comment.author_username,
                picture: comment.author_picture,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: String,
}
