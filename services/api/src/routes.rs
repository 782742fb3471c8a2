//! API routes
//!
//! One router per surface, nested under `/api`. The identity middleware runs
//! on every request; route-level policy is enforced by the extractors in
//! [`crate::middleware`].

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::AppConfig, middleware::identity_middleware, state::AppState};

pub mod achievements;
pub mod admin;
pub mod auth;
pub mod courses;
pub mod feedback;
pub mod media;
pub mod messages;
pub mod tasks;
pub mod uploads;
pub mod user_courses;
pub mod users;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth::router())
        .nest("/api/users", users::router())
        .nest("/api/achievements", achievements::router())
        .nest("/api/messages", messages::router())
        .nest("/api/courses", courses::router())
        .nest("/api/tasks", tasks::router())
        .nest("/api/user/courses", user_courses::router())
        .nest("/api/feedback", feedback::router())
        .nest("/api/media", media::router())
        .nest("/api/uploads", uploads::router())
        .nest("/api/admin", admin::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}
