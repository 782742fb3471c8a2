//! Authentication middleware and request extractors

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{error::ApiError, models::user::Role, state::AppState};

/// Authenticated user information resolved from a bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role == Role::Admin.as_str())
    }
}

/// Whether `user` may modify a resource owned by `owner_id`
pub fn can_modify(user: &AuthUser, owner_id: Uuid) -> bool {
    user.is_admin() || user.id == owner_id
}

/// Identity middleware
///
/// Resolves the `Authorization: Bearer` header into an [`AuthUser`] request
/// extension. Requests without a usable token pass through anonymously so
/// public routes keep working; protected handlers reject via the extractors.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    if let Some(token) = token {
        match state.jwt_service.validate_token(token) {
            Ok(claims) => {
                match state.user_repository.find_by_username(&claims.sub).await {
                    Ok(Some(user)) if user.enabled => {
                        req.extensions_mut().insert(AuthUser {
                            id: user.id,
                            username: user.username,
                            roles: user.roles,
                        });
                    }
                    Ok(_) => {
                        tracing::debug!("Token subject has no active account: {}", claims.sub);
                    }
                    Err(e) => {
                        tracing::error!("Failed to resolve token subject: {}", e);
                    }
                }
            }
            Err(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
            }
        }
    }

    next.run(req).await
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

/// Extractor that additionally requires the admin role
pub struct AdminUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.is_admin() {
            Ok(AdminUser(user))
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Extractor for routes that behave differently for signed-in callers
pub struct MaybeUser(pub Option<AuthUser>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<AuthUser>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_roles(roles: Vec<&str>) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            username: "testuser".to_string(),
            roles: roles.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn test_is_admin() {
        assert!(user_with_roles(vec!["ROLE_USER", "ROLE_ADMIN"]).is_admin());
        assert!(!user_with_roles(vec!["ROLE_USER"]).is_admin());
        assert!(!user_with_roles(vec![]).is_admin());
    }

    #[test]
    fn test_can_modify_owner() {
        let user = user_with_roles(vec!["ROLE_USER"]);
        assert!(can_modify(&user, user.id));
    }

    #[test]
    fn test_can_modify_other_user_denied() {
        let user = user_with_roles(vec!["ROLE_USER"]);
        assert!(!can_modify(&user, Uuid::new_v4()));
    }

    #[test]
    fn test_can_modify_admin_override() {
        let admin = user_with_roles(vec!["ROLE_ADMIN"]);
        assert!(can_modify(&admin, Uuid::new_v4()));
    }
}
