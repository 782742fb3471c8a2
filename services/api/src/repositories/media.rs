//! Media repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::media::{CreateMediaRequest, Media};

/// Media repository for database operations
#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    /// Create a new media repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register metadata for an upload the client already performed
    pub async fn create(&self, uploaded_by: Uuid, payload: &CreateMediaRequest) -> Result<Media> {
        let media = sqlx::query_as::<_, Media>(
            r#"
            INSERT INTO media (public_id, url, type, title, description, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, public_id, url, type, title, description, uploaded_by, created_at
            "#,
        )
        .bind(&payload.public_id)
        .bind(&payload.url)
        .bind(&payload.media_type)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(uploaded_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(media)
    }

    /// Get a media item by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Media>> {
        let media = sqlx::query_as::<_, Media>(
            r#"
            SELECT id, public_id, url, type, title, description, uploaded_by, created_at
            FROM media
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(media)
    }

    /// Get all media items, newest first
    pub async fn get_all(&self) -> Result<Vec<Media>> {
        let items = sqlx::query_as::<_, Media>(
            r#"
            SELECT id, public_id, url, type, title, description, uploaded_by, created_at
            FROM media
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Media registered by one user, newest first
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Media>> {
        let items = sqlx::query_as::<_, Media>(
            r#"
            SELECT id, public_id, url, type, title, description, uploaded_by, created_at
            FROM media
            WHERE uploaded_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Delete a media item by ID
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
