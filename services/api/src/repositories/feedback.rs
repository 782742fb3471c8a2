//! Feedback repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::feedback::{
    CreateFeedbackRequest, Feedback, FeedbackResponse, FeedbackStatsResponse, UpdateFeedbackRequest,
};

const FEEDBACK_QUERY: &str = r#"
    SELECT f.id, f.user_id, f.course_id, f.title, f.description, f.type,
           f.rating, f.status, f.admin_response, f.created_at, f.updated_at,
           COALESCE(u.name, u.username) AS user_name, u.email AS user_email,
           c.title AS course_name
    FROM feedback f
    LEFT JOIN users u ON u.id = f.user_id
    LEFT JOIN courses c ON c.id = f.course_id
"#;

fn feedback_row(row: PgRow) -> FeedbackResponse {
    FeedbackResponse {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        feedback_type: row.get("type"),
        rating: row.get("rating"),
        status: row.get("status"),
        admin_response: row.get("admin_response"),
        user_id: row.get("user_id"),
        user_name: row.get("user_name"),
        user_email: row.get("user_email"),
        course_id: row.get("course_id"),
        course_name: row.get("course_name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Sort keys accepted by the listing, mapped onto real columns
fn sort_column(sort_by: &str) -> &'static str {
    match sort_by {
        "updatedAt" => "f.updated_at",
        "rating" => "f.rating",
        "status" => "f.status",
        _ => "f.created_at",
    }
}

fn sort_direction(direction: &str) -> &'static str {
    if direction.eq_ignore_ascii_case("asc") {
        "ASC"
    } else {
        "DESC"
    }
}

/// Feedback repository
#[derive(Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    /// Create a new feedback repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new feedback entry in PENDING state
    pub async fn create(&self, user_id: Uuid, payload: &CreateFeedbackRequest) -> Result<Feedback> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (user_id, course_id, title, description, type, rating)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, course_id, title, description, type, rating,
                      status, admin_response, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(payload.course_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.feedback_type)
        .bind(payload.rating)
        .fetch_one(&self.pool)
        .await?;

        Ok(feedback)
    }

    /// Find a feedback row by ID (no joins; for ownership checks)
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT id, user_id, course_id, title, description, type, rating,
                   status, admin_response, created_at, updated_at
            FROM feedback
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(feedback)
    }

    /// Single entry with submitter and course context resolved
    pub async fn find_projected(&self, id: Uuid) -> Result<Option<FeedbackResponse>> {
        let sql = format!("{} WHERE f.id = $1", FEEDBACK_QUERY);

        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.map(feedback_row))
    }

    /// Paginated listing, optionally restricted to one status
    pub async fn list(
        &self,
        status: Option<&str>,
        page: u32,
        limit: u32,
        sort_by: &str,
        direction: &str,
    ) -> Result<(Vec<FeedbackResponse>, i64)> {
        let offset = (page.saturating_sub(1) as i64) * limit as i64;

        let sql = format!(
            "{} WHERE ($1::TEXT IS NULL OR f.status = $1) ORDER BY {} {} LIMIT $2 OFFSET $3",
            FEEDBACK_QUERY,
            sort_column(sort_by),
            sort_direction(direction),
        );

        let rows = sqlx::query(&sql)
            .bind(status)
            .bind(limit as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM feedback WHERE ($1::TEXT IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows.into_iter().map(feedback_row).collect(), total))
    }

    /// All entries submitted by one user, newest first
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<FeedbackResponse>> {
        let sql = format!(
            "{} WHERE f.user_id = $1 ORDER BY f.created_at DESC",
            FEEDBACK_QUERY
        );

        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(feedback_row).collect())
    }

    /// Partial update of the submitter-owned fields
    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateFeedbackRequest,
    ) -> Result<Option<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            UPDATE feedback
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                type = COALESCE($4, type),
                rating = COALESCE($5, rating),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, course_id, title, description, type, rating,
                      status, admin_response, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.feedback_type)
        .bind(payload.rating)
        .fetch_optional(&self.pool)
        .await?;

        Ok(feedback)
    }

    /// Move an entry through the status workflow
    pub async fn set_status(
        &self,
        id: Uuid,
        status: &str,
        admin_response: Option<&str>,
    ) -> Result<Option<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            UPDATE feedback
            SET status = $2,
                admin_response = COALESCE($3, admin_response),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, course_id, title, description, type, rating,
                      status, admin_response, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(admin_response)
        .fetch_optional(&self.pool)
        .await?;

        Ok(feedback)
    }

    /// Delete a feedback entry
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts per status and the mean rating over everything
    pub async fn stats(&self) -> Result<FeedbackStatsResponse> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'PENDING') AS pending,
                   COUNT(*) FILTER (WHERE status = 'REVIEWED') AS reviewed,
                   COUNT(*) FILTER (WHERE status = 'RESOLVED') AS resolved,
                   COUNT(*) FILTER (WHERE status = 'REJECTED') AS rejected,
                   COALESCE(AVG(rating), 0)::DOUBLE PRECISION AS average_rating
            FROM feedback
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(FeedbackStatsResponse {
            total: row.get("total"),
            pending: row.get("pending"),
            reviewed: row.get("reviewed"),
            resolved: row.get("resolved"),
            rejected: row.get("rejected"),
            average_rating: row.get("average_rating"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column("updatedAt"), "f.updated_at");
        assert_eq!(sort_column("rating"), "f.rating");
        assert_eq!(sort_column("status"), "f.status");
        assert_eq!(sort_column("createdAt"), "f.created_at");
        // Anything unknown falls back instead of reaching the SQL string
        assert_eq!(sort_column("id; DROP TABLE feedback"), "f.created_at");
    }

    #[test]
    fn test_sort_direction() {
        assert_eq!(sort_direction("asc"), "ASC");
        assert_eq!(sort_direction("ASC"), "ASC");
        assert_eq!(sort_direction("desc"), "DESC");
        assert_eq!(sort_direction("sideways"), "DESC");
    }
}
