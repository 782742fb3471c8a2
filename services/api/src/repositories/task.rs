//! Task repository for database operations
//!
//! Template rows (user_id NULL) describe a course's checklist; per-user rows
//! are copied from the template the first time a user opens the course. The
//! copy is frozen: later template edits never touch existing per-user rows.

use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::task::{Task, TemplateTaskRequest, UpdateTaskRequest};

fn percentage(completed: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * completed as f64 / total as f64
    }
}

/// Task repository
#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Create a new task repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a template task for a course
    pub async fn create_template(
        &self,
        course_id: Uuid,
        payload: &TemplateTaskRequest,
    ) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (course_id, user_id, title, description, order_index, due_date)
            VALUES ($1, NULL, $2, $3, $4, $5)
            RETURNING id, course_id, user_id, title, description, order_index,
                      completed, due_date, created_at, updated_at
            "#,
        )
        .bind(course_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.order_index)
        .bind(payload.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    /// Template tasks for a course, in checklist order
    pub async fn templates_for_course(&self, course_id: Uuid) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, course_id, user_id, title, description, order_index,
                   completed, due_date, created_at, updated_at
            FROM tasks
            WHERE course_id = $1 AND user_id IS NULL
            ORDER BY order_index
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Replace the template wholesale; per-user rows are untouched
    pub async fn replace_templates(
        &self,
        course_id: Uuid,
        tasks: &[TemplateTaskRequest],
    ) -> Result<Vec<Task>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tasks WHERE course_id = $1 AND user_id IS NULL")
            .bind(course_id)
            .execute(&mut *tx)
            .await?;

        let mut created = Vec::with_capacity(tasks.len());
        for task in tasks {
            let row = sqlx::query_as::<_, Task>(
                r#"
                INSERT INTO tasks (course_id, user_id, title, description, order_index, due_date)
                VALUES ($1, NULL, $2, $3, $4, $5)
                RETURNING id, course_id, user_id, title, description, order_index,
                          completed, due_date, created_at, updated_at
                "#,
            )
            .bind(course_id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.order_index)
            .bind(task.due_date)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;

        Ok(created)
    }

    /// Find a task by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, course_id, user_id, title, description, order_index,
                   completed, due_date, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Partial update of a template row; absent fields keep their value
    pub async fn update_template(
        &self,
        id: Uuid,
        payload: &UpdateTaskRequest,
    ) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                order_index = COALESCE($4, order_index),
                due_date = COALESCE($5, due_date),
                updated_at = NOW()
            WHERE id = $1 AND user_id IS NULL
            RETURNING id, course_id, user_id, title, description, order_index,
                      completed, due_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.order_index)
        .bind(payload.due_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Delete a template row
    pub async fn delete_template(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// A user's tasks for a course, copying the template on first access.
    /// The copy happens at most once per (course, user): once any per-user
    /// row exists, the template is never consulted again, and the partial
    /// unique index dedupes concurrent first accesses.
    pub async fn tasks_for_user(&self, course_id: Uuid, user_id: Uuid) -> Result<Vec<Task>> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE course_id = $1 AND user_id = $2")
                .bind(course_id)
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        if existing == 0 {
            sqlx::query(
                r#"
                INSERT INTO tasks (course_id, user_id, title, description, order_index,
                                   completed, due_date)
                SELECT course_id, $2, title, description, order_index, FALSE, due_date
                FROM tasks
                WHERE course_id = $1 AND user_id IS NULL
                ON CONFLICT (course_id, user_id, order_index) WHERE user_id IS NOT NULL
                DO NOTHING
                "#,
            )
            .bind(course_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, course_id, user_id, title, description, order_index,
                   completed, due_date, created_at, updated_at
            FROM tasks
            WHERE course_id = $1 AND user_id = $2
            ORDER BY order_index
            "#,
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(tasks)
    }

    /// Set the completed flag on a materialized row
    pub async fn set_completed(&self, id: Uuid, completed: bool) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET completed = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, course_id, user_id, title, description, order_index,
                      completed, due_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(completed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Completion percentage over a user's materialized tasks
    pub async fn progress(&self, course_id: Uuid, user_id: Uuid) -> Result<f64> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) FILTER (WHERE completed) AS completed_count,
                   COUNT(*) AS total_count
            FROM tasks
            WHERE course_id = $1 AND user_id = $2
            "#,
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let completed: i64 = row.get("completed_count");
        let total: i64 = row.get("total_count");

        Ok(percentage(completed, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_empty_course() {
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn test_percentage_one_of_three() {
        let value = percentage(1, 3);
        assert!((value - 33.333333333333336).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_all_done() {
        assert_eq!(percentage(4, 4), 100.0);
    }
}
