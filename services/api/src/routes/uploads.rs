//! Upload signature route

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use chrono::Utc;

use crate::{
    error::ApiResult,
    middleware::AuthUser,
    models::media::UploadSignatureResponse,
    state::AppState,
    upload::sign_upload_params,
};

/// Create the router for the upload routes
pub fn router() -> Router<AppState> {
    Router::new().route("/signature", get(get_upload_signature))
}

/// Signed parameter bundle the client presents to the media host.
/// The timestamp is signed, so the bundle expires on the host's clock.
pub async fn get_upload_signature(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let timestamp = Utc::now().timestamp().to_string();

    let signature = sign_upload_params(
        &[
            ("timestamp", &timestamp),
            ("upload_preset", &state.config.upload_preset),
        ],
        &state.config.upload_api_secret,
    );

    Ok(Json(UploadSignatureResponse {
        timestamp,
        upload_preset: state.config.upload_preset.clone(),
        signature,
    }))
}
