//! Comment repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::comment::Comment;
use crate::models::user::User;

/// Comment repository
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a comment, snapshotting the author for later display
    pub async fn create(&self, achievement_id: Uuid, author: &User, text: &str) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (achievement_id, author_id, author_username, author_picture, text)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, achievement_id, author_id, author_username, author_picture,
                      text, created_at
            "#,
        )
        .bind(achievement_id)
        .bind(author.id)
        .bind(&author.username)
        .bind(&author.picture)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Comments on one achievement, newest first
    pub async fn list_for_achievement(&self, achievement_id: Uuid) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, achievement_id, author_id, author_username, author_picture,
                   text, created_at
            FROM comments
            WHERE achievement_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(achievement_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// All comments, newest first (admin moderation view)
    pub async fn get_all(&self) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, achievement_id, author_id, author_username, author_picture,
                   text, created_at
            FROM comments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Find a comment by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, achievement_id, author_id, author_username, author_picture,
                   text, created_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Replace the comment text
    pub async fn update_text(&self, id: Uuid, text: &str) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET text = $2
            WHERE id = $1
            RETURNING id, achievement_id, author_id, author_username, author_picture,
                      text, created_at
            "#,
        )
        .bind(id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Delete a comment by ID
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
