//! Authentication routes
//!
//! Local registration and login, the Google authorization-code flow, and the
//! idempotent admin bootstrap. Both halves of the Google flow answer with 302
//! redirects back to the frontend, success or not.

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::user::{Role, User, UserResponse, UserSummary},
    state::AppState,
    validation,
};

/// Request for user registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for user login
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    #[allow(dead_code)]
    pub state: Option<String>,
}

/// Create the router for the authentication routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/current-user", get(current_user))
        .route("/init-admin", post(init_admin))
        .route("/google", get(google_login))
        .route("/google/callback", get(google_callback))
}

/// Register a new local user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_username(&payload.username).map_err(ApiError::BadRequest)?;
    validation::validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    validation::validate_password(&payload.password).map_err(ApiError::BadRequest)?;

    let username_taken = state
        .user_repository
        .username_exists(&payload.username)
        .await
        .map_err(|e| {
            error!("Failed to check username: {}", e);
            ApiError::InternalServerError
        })?;
    if username_taken {
        return Err(ApiError::BadRequest("Username is already taken".to_string()));
    }

    let email_taken = state
        .user_repository
        .email_exists(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to check email: {}", e);
            ApiError::InternalServerError
        })?;
    if email_taken {
        return Err(ApiError::BadRequest("Email is already in use".to_string()));
    }

    let password_hash = state.password_service.hash(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::InternalServerError
    })?;

    state
        .user_repository
        .create_local(&payload.username, &payload.email, &password_hash)
        .await
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({"message": "User registered successfully"})))
}

/// Local credential login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for user: {}", payload.username);

    let user = state
        .user_repository
        .find_by_username(&payload.username)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthorized)?;

    if !user.enabled {
        return Err(ApiError::Unauthorized);
    }

    // Federated accounts have no local password and can never pass here
    let stored_hash = user.password_hash.as_deref().ok_or(ApiError::Unauthorized)?;
    if !state.password_service.verify(&payload.password, stored_hash) {
        return Err(ApiError::Unauthorized);
    }

    let token = state.jwt_service.generate_token(&user.username).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(LoginResponse {
        token,
        user: UserSummary::from(&user),
    }))
}

/// Profile of the request principal
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_id(auth.id)
        .await
        .map_err(|e| {
            error!("Failed to load user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(UserResponse::from(user)))
}

/// Resolve the bearer token explicitly: 401 without a valid token, 404 when
/// the subject account no longer exists.
pub async fn current_user(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> ApiResult<impl IntoResponse> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = state
        .jwt_service
        .validate_token(bearer.token())
        .map_err(|_| ApiError::Unauthorized)?;

    let user = state
        .user_repository
        .find_by_username(&claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to load user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Idempotently create the default admin account
pub async fn init_admin(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let exists = state
        .user_repository
        .username_exists(&state.config.admin_username)
        .await
        .map_err(|e| {
            error!("Failed to check admin user: {}", e);
            ApiError::InternalServerError
        })?;

    if exists {
        return Ok(Json(json!({"message": "Admin user already exists"})));
    }

    let password_hash = state
        .password_service
        .hash(&state.config.admin_password)
        .map_err(|e| {
            error!("Failed to hash admin password: {}", e);
            ApiError::InternalServerError
        })?;

    state
        .user_repository
        .create_managed(
            &state.config.admin_username,
            &state.config.admin_email,
            &password_hash,
            &[Role::Admin.as_str().to_string()],
            true,
        )
        .await
        .map_err(|e| {
            error!("Failed to create admin user: {}", e);
            ApiError::InternalServerError
        })?;

    info!("Created default admin user: {}", state.config.admin_username);

    Ok(Json(json!({"message": "Admin user created successfully"})))
}

/// Start the Google flow with a 302 to the provider's consent page
pub async fn google_login(State(state): State<AppState>) -> impl IntoResponse {
    let url = state.oauth_client.authorize_url();
    (StatusCode::FOUND, [(header::LOCATION, url)])
}

/// Finish the Google flow; both outcomes redirect back to the frontend
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
) -> impl IntoResponse {
    match complete_google_login(&state, query).await {
        Ok(token) => {
            let url = format!("{}/auth/callback?token={}", state.config.frontend_url, token);
            (StatusCode::FOUND, [(header::LOCATION, url)])
        }
        Err(e) => {
            error!("Google login failed: {}", e);
            let url = format!("{}/login?error=auth_failed", state.config.frontend_url);
            (StatusCode::FOUND, [(header::LOCATION, url)])
        }
    }
}

async fn complete_google_login(state: &AppState, query: GoogleCallbackQuery) -> Result<String> {
    let code = query
        .code
        .ok_or_else(|| anyhow::anyhow!("Missing authorization code"))?;

    let access_token = state.oauth_client.exchange_code(code).await?;
    let profile = state.oauth_client.fetch_profile(&access_token).await?;

    let user = upsert_google_user(state, &profile).await?;
    if !user.enabled {
        anyhow::bail!("Account is disabled: {}", user.username);
    }

    let token = state.jwt_service.generate_token(&user.username)?;
    Ok(token)
}

/// Upsert keyed by email: first federated login creates the account, later
/// logins refresh the display name and picture.
async fn upsert_google_user(
    state: &AppState,
    profile: &crate::oauth::GoogleProfile,
) -> Result<User> {
    if let Some(existing) = state.user_repository.find_by_email(&profile.email).await? {
        let refreshed = state
            .user_repository
            .update_federated_profile(
                existing.id,
                profile.name.as_deref(),
                profile.picture.as_deref(),
            )
            .await?;
        return Ok(refreshed.unwrap_or(existing));
    }

    let username = derive_username(state, &profile.email).await?;
    info!("First Google login, creating account: {}", username);

    let user = state
        .user_repository
        .create_federated(
            &username,
            &profile.email,
            profile.name.as_deref(),
            profile.picture.as_deref(),
        )
        .await?;

    Ok(user)
}

/// Username from the email local part, with a random suffix on collision
async fn derive_username(state: &AppState, email: &str) -> Result<String> {
    let base = email.split('@').next().unwrap_or("user").to_string();

    if !state.user_repository.username_exists(&base).await? {
        return Ok(base);
    }

    for _ in 0..5 {
        let candidate = format!("{}{}", base, rand::thread_rng().gen_range(1000..10000));
        if !state.user_repository.username_exists(&candidate).await? {
            return Ok(candidate);
        }
    }

    anyhow::bail!("Could not derive a free username for {}", email)
}
