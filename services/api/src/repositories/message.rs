//! Message repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::message::Message;

/// Message repository
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new message, unread
    pub async fn send(&self, sender_id: Uuid, recipient_id: Uuid, content: &str) -> Result<Message> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (sender_id, recipient_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, sender_id, recipient_id, content, timestamp, read
            "#,
        )
        .bind(sender_id)
        .bind(recipient_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// All messages between two users, oldest first. Marks the caller's
    /// unread messages from the partner as read in the same transaction, so
    /// the returned rows already carry the updated flag.
    pub async fn conversation(&self, user_id: Uuid, partner_id: Uuid) -> Result<Vec<Message>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE messages
            SET read = TRUE
            WHERE recipient_id = $1 AND sender_id = $2 AND read = FALSE
            "#,
        )
        .bind(user_id)
        .bind(partner_id)
        .execute(&mut *tx)
        .await?;

        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, recipient_id, content, timestamp, read
            FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY timestamp ASC
            "#,
        )
        .bind(user_id)
        .bind(partner_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(messages)
    }

    /// Latest message per conversation partner, newest conversation first
    pub async fn latest_per_partner(&self, user_id: Uuid) -> Result<Vec<(Uuid, Message)>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT ON (CASE WHEN sender_id = $1 THEN recipient_id ELSE sender_id END)
                   id, sender_id, recipient_id, content, timestamp, read,
                   CASE WHEN sender_id = $1 THEN recipient_id ELSE sender_id END AS partner_id
            FROM messages
            WHERE sender_id = $1 OR recipient_id = $1
            ORDER BY CASE WHEN sender_id = $1 THEN recipient_id ELSE sender_id END,
                     timestamp DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut conversations: Vec<(Uuid, Message)> = rows
            .into_iter()
            .map(|row| {
                let message = Message {
                    id: row.get("id"),
                    sender_id: row.get("sender_id"),
                    recipient_id: row.get("recipient_id"),
                    content: row.get("content"),
                    timestamp: row.get("timestamp"),
                    read: row.get("read"),
                };
                (row.get("partner_id"), message)
            })
            .collect();

        conversations.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));

        Ok(conversations)
    }

    /// Unread message count per sender
    pub async fn unread_counts_by_sender(&self, user_id: Uuid) -> Result<Vec<(Uuid, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT sender_id, COUNT(*) AS unread
            FROM messages
            WHERE recipient_id = $1 AND read = FALSE
            GROUP BY sender_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("sender_id"), row.get("unread")))
            .collect())
    }

    /// Total unread messages for a user
    pub async fn unread_total(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages WHERE recipient_id = $1 AND read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Find a message by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, recipient_id, content, timestamp, read
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    /// Delete a message by ID
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
