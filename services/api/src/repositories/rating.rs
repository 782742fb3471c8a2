//! Rating repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::rating::Rating;

/// Rating repository
#[derive(Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    /// Create a new rating repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert the caller's rating for a course and refresh the course's
    /// denormalized aggregates in the same transaction.
    pub async fn rate(&self, course_id: Uuid, user_id: Uuid, stars: i32) -> Result<Rating> {
        let mut tx = self.pool.begin().await?;

        let rating = sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO ratings (course_id, user_id, stars)
            VALUES ($1, $2, $3)
            ON CONFLICT (course_id, user_id)
            DO UPDATE SET stars = EXCLUDED.stars, rated_at = NOW()
            RETURNING id, course_id, user_id, stars, rated_at
            "#,
        )
        .bind(course_id)
        .bind(user_id)
        .bind(stars)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE courses
            SET rating_count = totals.rating_count,
                average_rating = totals.average_rating,
                updated_at = NOW()
            FROM (
                SELECT COUNT(*) AS rating_count,
                       COALESCE(AVG(stars), 0)::DOUBLE PRECISION AS average_rating
                FROM ratings
                WHERE course_id = $1
            ) AS totals
            WHERE id = $1
            "#,
        )
        .bind(course_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(rating)
    }

    /// All ratings for a course, newest first
    pub async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<Rating>> {
        let ratings = sqlx::query_as::<_, Rating>(
            r#"
            SELECT id, course_id, user_id, stars, rated_at
            FROM ratings
            WHERE course_id = $1
            ORDER BY rated_at DESC
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }
}
