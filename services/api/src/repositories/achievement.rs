//! Achievement repository for database operations
//!
//! Feed reads resolve the author with a LEFT JOIN and compute the viewer's
//! hasLiked flag with an EXISTS subquery; neither is stored. Like and unlike
//! keep the denormalized counter and the uniqueness set in step inside one
//! transaction.

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::achievement::{
    Achievement, AchievementResponse, CreateAchievementRequest, UpdateAchievementRequest,
};
use crate::models::user::AuthorSummary;

const FEED_QUERY: &str = r#"
    SELECT a.id, a.title, a.description, a.image_url, a.image_public_id,
           a.likes, a.created_at,
           u.id AS author_id, u.username AS author_username,
           u.name AS author_name, u.picture AS author_picture,
           EXISTS (
               SELECT 1 FROM user_likes ul
               WHERE ul.achievement_id = a.id AND ul.user_id = $1
           ) AS has_liked
    FROM achievements a
    LEFT JOIN users u ON u.id = a.author_id
"#;

fn feed_row(row: PgRow) -> AchievementResponse {
    let author = row
        .get::<Option<Uuid>, _>("author_id")
        .map(|id| AuthorSummary {
            id,
            username: row.get("author_username"),
            name: row.get("author_name"),
            picture: row.get("author_picture"),
        });

    AchievementResponse {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        image_url: row.get("image_url"),
        image_public_id: row.get("image_public_id"),
        likes: row.get("likes"),
        has_liked: row.get("has_liked"),
        created_at: row.get("created_at"),
        author,
    }
}

/// Achievement repository
#[derive(Clone)]
pub struct AchievementRepository {
    pool: PgPool,
}

impl AchievementRepository {
    /// Create a new achievement repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new achievement
    pub async fn create(
        &self,
        author_id: Uuid,
        payload: &CreateAchievementRequest,
    ) -> Result<Achievement> {
        let achievement = sqlx::query_as::<_, Achievement>(
            r#"
            INSERT INTO achievements (author_id, title, description, image_url, image_public_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, author_id, title, description, image_url, image_public_id,
                      likes, created_at
            "#,
        )
        .bind(author_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.image_url)
        .bind(&payload.image_public_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(achievement)
    }

    /// Find an achievement by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Achievement>> {
        let achievement = sqlx::query_as::<_, Achievement>(
            r#"
            SELECT id, author_id, title, description, image_url, image_public_id,
                   likes, created_at
            FROM achievements
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(achievement)
    }

    /// Whether an achievement exists
    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM achievements WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Full feed, newest first, projected for the given viewer
    pub async fn feed(&self, viewer_id: Option<Uuid>) -> Result<Vec<AchievementResponse>> {
        let sql = format!("{} ORDER BY a.created_at DESC", FEED_QUERY);

        let rows = sqlx::query(&sql)
            .bind(viewer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(feed_row).collect())
    }

    /// Achievements by one author, newest first, projected for the viewer
    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        viewer_id: Option<Uuid>,
    ) -> Result<Vec<AchievementResponse>> {
        let sql = format!("{} WHERE a.author_id = $2 ORDER BY a.created_at DESC", FEED_QUERY);

        let rows = sqlx::query(&sql)
            .bind(viewer_id)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(feed_row).collect())
    }

    /// Single achievement projected for the viewer
    pub async fn find_projected(
        &self,
        id: Uuid,
        viewer_id: Option<Uuid>,
    ) -> Result<Option<AchievementResponse>> {
        let sql = format!("{} WHERE a.id = $2", FEED_QUERY);

        let row = sqlx::query(&sql)
            .bind(viewer_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(feed_row))
    }

    /// Partial update; absent fields keep their value
    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateAchievementRequest,
    ) -> Result<Option<Achievement>> {
        let achievement = sqlx::query_as::<_, Achievement>(
            r#"
            UPDATE achievements
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                image_public_id = COALESCE($5, image_public_id)
            WHERE id = $1
            RETURNING id, author_id, title, description, image_url, image_public_id,
                      likes, created_at
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.image_url)
        .bind(&payload.image_public_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(achievement)
    }

    /// Delete an achievement together with its likes and comments
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_likes WHERE achievement_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM comments WHERE achievement_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM achievements WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a like. Returns the counter after the call, or None when the
    /// achievement does not exist. A repeated like changes nothing.
    pub async fn like(&self, achievement_id: Uuid, user_id: Uuid) -> Result<Option<i32>> {
        let mut tx = self.pool.begin().await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM achievements WHERE id = $1)")
                .bind(achievement_id)
                .fetch_one(&mut *tx)
                .await?;

        if !exists {
            return Ok(None);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO user_likes (user_id, achievement_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, achievement_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(achievement_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        // The counter moves only when the set actually changed
        if inserted > 0 {
            sqlx::query("UPDATE achievements SET likes = likes + 1 WHERE id = $1")
                .bind(achievement_id)
                .execute(&mut *tx)
                .await?;
        }

        let likes: i32 = sqlx::query_scalar("SELECT likes FROM achievements WHERE id = $1")
            .bind(achievement_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(likes))
    }

    /// Remove a like. Returns the counter after the call, or None when the
    /// achievement does not exist. A repeated unlike changes nothing.
    pub async fn unlike(&self, achievement_id: Uuid, user_id: Uuid) -> Result<Option<i32>> {
        let mut tx = self.pool.begin().await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM achievements WHERE id = $1)")
                .bind(achievement_id)
                .fetch_one(&mut *tx)
                .await?;

        if !exists {
            return Ok(None);
        }

        let deleted = sqlx::query(
            r#"
            DELETE FROM user_likes
            WHERE user_id = $1 AND achievement_id = $2
            "#,
        )
        .bind(user_id)
        .bind(achievement_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        // Clamped at zero even if counter and set ever disagree
        if deleted > 0 {
            sqlx::query("UPDATE achievements SET likes = GREATEST(likes - 1, 0) WHERE id = $1")
                .bind(achievement_id)
                .execute(&mut *tx)
                .await?;
        }

        let likes: i32 = sqlx::query_scalar("SELECT likes FROM achievements WHERE id = $1")
            .bind(achievement_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(likes))
    }
}
