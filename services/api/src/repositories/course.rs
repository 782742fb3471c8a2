//! Course repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::course::{Course, CreateCourseRequest, UpdateCourseRequest};

/// Course repository
#[derive(Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    /// Create a new course repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new course
    pub async fn create(&self, payload: &CreateCourseRequest) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (title, description, thumbnail_url, price, category,
                                 tags, instructor_id, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, thumbnail_url, price, category, tags,
                      instructor_id, is_published, rating_count, average_rating,
                      created_at, updated_at
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.thumbnail_url)
        .bind(payload.price)
        .bind(&payload.category)
        .bind(&payload.tags)
        .bind(payload.instructor_id)
        .bind(payload.is_published)
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    /// Find a course by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, title, description, thumbnail_url, price, category, tags,
                   instructor_id, is_published, rating_count, average_rating,
                   created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    /// Whether a course exists
    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM courses WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Get all courses, newest first
    pub async fn get_all(&self) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, title, description, thumbnail_url, price, category, tags,
                   instructor_id, is_published, rating_count, average_rating,
                   created_at, updated_at
            FROM courses
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    /// Courses taught by one instructor
    pub async fn list_by_instructor(&self, instructor_id: Uuid) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, title, description, thumbnail_url, price, category, tags,
                   instructor_id, is_published, rating_count, average_rating,
                   created_at, updated_at
            FROM courses
            WHERE instructor_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(instructor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    /// Courses in one category
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, title, description, thumbnail_url, price, category, tags,
                   instructor_id, is_published, rating_count, average_rating,
                   created_at, updated_at
            FROM courses
            WHERE category = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    /// Published courses only
    pub async fn list_published(&self) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, title, description, thumbnail_url, price, category, tags,
                   instructor_id, is_published, rating_count, average_rating,
                   created_at, updated_at
            FROM courses
            WHERE is_published = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    /// Case-insensitive title substring search
    pub async fn search_by_title(&self, term: &str) -> Result<Vec<Course>> {
        let pattern = format!("%{}%", term);

        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, title, description, thumbnail_url, price, category, tags,
                   instructor_id, is_published, rating_count, average_rating,
                   created_at, updated_at
            FROM courses
            WHERE title ILIKE $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    /// Partial update; absent fields keep their value
    pub async fn update(&self, id: Uuid, payload: &UpdateCourseRequest) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                thumbnail_url = COALESCE($4, thumbnail_url),
                price = COALESCE($5, price),
                category = COALESCE($6, category),
                tags = COALESCE($7, tags),
                instructor_id = COALESCE($8, instructor_id),
                is_published = COALESCE($9, is_published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, thumbnail_url, price, category, tags,
                      instructor_id, is_published, rating_count, average_rating,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.thumbnail_url)
        .bind(payload.price)
        .bind(&payload.category)
        .bind(&payload.tags)
        .bind(payload.instructor_id)
        .bind(payload.is_published)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    /// Delete a course together with its tasks and ratings
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tasks WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM ratings WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
