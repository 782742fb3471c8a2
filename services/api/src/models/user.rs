//! User model, role set, and user-facing projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Provider value for accounts created through local registration.
pub const PROVIDER_LOCAL: &str = "LOCAL";
/// Provider value for accounts created through the Google flow.
pub const PROVIDER_GOOGLE: &str = "GOOGLE";

/// Closed set of roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }

    /// Parse a single role name
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "ROLE_USER" => Ok(Role::User),
            "ROLE_ADMIN" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }

    /// Validate a set of role names against the closed set
    pub fn validate_all(values: &[String]) -> Result<(), String> {
        for value in values {
            Role::parse(value)?;
        }
        Ok(())
    }
}

/// User entity
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub provider: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub roles: Vec<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_local(&self) -> bool {
        self.provider == PROVIDER_LOCAL
    }
}

/// Full user projection returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub roles: Vec<String>,
    pub provider: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            picture: user.picture,
            roles: user.roles,
            provider: user.provider,
            enabled: user.enabled,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Compact identity payload embedded in the login response
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
        }
    }
}

/// Author projection attached to feed items; resolved at read time, so a
/// deleted author simply yields no value.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Self-service profile update payload
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Payload for the dedicated picture update route
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePictureRequest {
    pub picture: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_known_roles() {
        assert_eq!(Role::parse("ROLE_USER").unwrap(), Role::User);
        assert_eq!(Role::parse("ROLE_ADMIN").unwrap(), Role::Admin);
    }

    #[test]
    fn test_role_parse_rejects_unknown_role() {
        let err = Role::parse("ROLE_SUPERUSER").unwrap_err();
        assert_eq!(err, "Unknown role: ROLE_SUPERUSER");
    }

    #[test]
    fn test_role_validate_all() {
        let valid = vec!["ROLE_USER".to_string(), "ROLE_ADMIN".to_string()];
        assert!(Role::validate_all(&valid).is_ok());

        let invalid = vec!["ROLE_USER".to_string(), "root".to_string()];
        assert!(Role::validate_all(&invalid).is_err());
    }
}
