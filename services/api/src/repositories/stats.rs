//! Aggregate counters for the admin dashboard

use anyhow::Result;
use sqlx::{PgPool, Row};

use crate::models::admin::AdminStatsResponse;

/// Stats repository
#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    /// Create a new stats repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Dashboard counters, collected in a single round trip
    pub async fn admin_stats(&self) -> Result<AdminStatsResponse> {
        let row = sqlx::query(
            r#"
            SELECT (SELECT COUNT(*) FROM users) AS total_users,
                   (SELECT COUNT(*) FROM users WHERE enabled) AS active_users,
                   (SELECT COUNT(*) FROM comments) AS total_comments,
                   (SELECT COUNT(*) FROM achievements) AS total_achievements,
                   (SELECT COUNT(*) FROM courses) AS total_courses,
                   (SELECT COUNT(*) FROM media) AS total_media
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(AdminStatsResponse {
            total_users: row.get("total_users"),
            active_users: row.get("active_users"),
            total_comments: row.get("total_comments"),
            total_achievements: row.get("total_achievements"),
            total_courses: row.get("total_courses"),
            total_media: row.get("total_media"),
        })
    }
}
