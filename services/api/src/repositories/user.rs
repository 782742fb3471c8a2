//! User repository for database operations
//!
//! Also owns the follow graph. A follow edge is a single row, so the
//! follower and following views of the same relation cannot diverge.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::user::{PROVIDER_GOOGLE, PROVIDER_LOCAL, Role, User};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a locally registered user
    pub async fn create_local(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User> {
        info!("Creating new user: {}", username);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, provider, roles)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, provider, name, picture,
                      roles, enabled, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(PROVIDER_LOCAL)
        .bind(vec![Role::User.as_str().to_string()])
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Create a user from a federated profile; no local password
    pub async fn create_federated(
        &self,
        username: &str,
        email: &str,
        name: Option<&str>,
        picture: Option<&str>,
    ) -> Result<User> {
        info!("Creating federated user: {}", username);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, provider, name, picture, roles)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, email, password_hash, provider, name, picture,
                      roles, enabled, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(PROVIDER_GOOGLE)
        .bind(name)
        .bind(picture)
        .bind(vec![Role::User.as_str().to_string()])
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Create a user with explicit roles and enabled flag (admin facade)
    pub async fn create_managed(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        roles: &[String],
        enabled: bool,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, provider, roles, enabled)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, email, password_hash, provider, name, picture,
                      roles, enabled, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(PROVIDER_LOCAL)
        .bind(roles)
        .bind(enabled)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, provider, name, picture,
                   roles, enabled, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, provider, name, picture,
                   roles, enabled, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, provider, name, picture,
                   roles, enabled, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find several users at once; missing ids are simply absent
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, provider, name, picture,
                   roles, enabled, created_at, updated_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Get all users
    pub async fn get_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, provider, name, picture,
                   roles, enabled, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Case-insensitive substring search over username and display name
    pub async fn search(&self, term: &str, limit: i64) -> Result<Vec<User>> {
        let pattern = format!("%{}%", term);

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, provider, name, picture,
                   roles, enabled, created_at, updated_at
            FROM users
            WHERE username ILIKE $1 OR name ILIKE $1
            ORDER BY username
            LIMIT $2
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Check whether a username is already taken
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Check whether an email is already in use
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Self-service profile update; absent fields keep their value
    pub async fn update_profile(
        &self,
        id: Uuid,
        username: Option<&str>,
        name: Option<&str>,
        picture: Option<&str>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                name = COALESCE($3, name),
                picture = COALESCE($4, picture),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, password_hash, provider, name, picture,
                      roles, enabled, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(name)
        .bind(picture)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Replace the profile picture
    pub async fn update_picture(&self, id: Uuid, picture: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET picture = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, password_hash, provider, name, picture,
                      roles, enabled, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(picture)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Refresh the display fields carried by a federated profile
    pub async fn update_federated_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        picture: Option<&str>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                picture = COALESCE($3, picture),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, password_hash, provider, name, picture,
                      roles, enabled, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(picture)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Admin update of account fields; absent fields keep their value
    pub async fn admin_update(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        enabled: Option<bool>,
        roles: Option<&[String]>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                enabled = COALESCE($4, enabled),
                roles = COALESCE($5, roles),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, password_hash, provider, name, picture,
                      roles, enabled, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(enabled)
        .bind(roles)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Replace the role set
    pub async fn set_roles(&self, id: Uuid, roles: &[String]) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET roles = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, password_hash, provider, name, picture,
                      roles, enabled, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(roles)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete a user; rows that point at the user stay behind
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a follow edge; repeat calls are no-ops
    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_follows (follower_id, followee_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a follow edge; repeat calls are no-ops
    pub async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_follows
            WHERE follower_id = $1 AND followee_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether follower currently follows followee
    pub async fn is_following(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM user_follows
                WHERE follower_id = $1 AND followee_id = $2
            )
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Users following the given user
    pub async fn followers_of(&self, user_id: Uuid) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.password_hash, u.provider, u.name,
                   u.picture, u.roles, u.enabled, u.created_at, u.updated_at
            FROM user_follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.followee_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Users the given user follows
    pub async fn following_of(&self, user_id: Uuid) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.password_hash, u.provider, u.name,
                   u.picture, u.roles, u.enabled, u.created_at, u.updated_at
            FROM user_follows f
            JOIN users u ON u.id = f.followee_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
