//! Direct message routes

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::message::{
        ConversationResponse, MessageResponse, SendMessageRequest, UnreadCountResponse,
    },
    models::user::User,
    state::AppState,
};

/// Create the router for the message routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send/:username", post(send_message))
        .route("/conversation/:username", get(get_conversation))
        .route("/conversations", get(get_conversations))
        .route("/unread-count", get(get_unread_count))
        .route("/:id", delete(delete_message))
}

/// Send a message to a user addressed by username. Whitespace-only content
/// is allowed; messages are stored verbatim.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
    Json(payload): Json<SendMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let recipient = state
        .user_repository
        .find_by_username(&username)
        .await
        .map_err(|e| {
            error!("Failed to resolve recipient: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let message = state
        .message_repository
        .send(auth.id, recipient.id, &payload.content)
        .await
        .map_err(|e| {
            error!("Failed to send message: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(MessageResponse::from(message)))
}

/// All messages with one partner, oldest first; reading marks the caller's
/// unread messages from that partner as read.
pub async fn get_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let partner = state
        .user_repository
        .find_by_username(&username)
        .await
        .map_err(|e| {
            error!("Failed to resolve partner: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let messages = state
        .message_repository
        .conversation(auth.id, partner.id)
        .await
        .map_err(|e| {
            error!("Failed to load conversation: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(
        messages
            .into_iter()
            .map(MessageResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// One entry per conversation partner. Partners whose account no longer
/// exists are skipped.
pub async fn get_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let latest = state
        .message_repository
        .latest_per_partner(auth.id)
        .await
        .map_err(|e| {
            error!("Failed to load conversations: {}", e);
            ApiError::InternalServerError
        })?;

    let unread: HashMap<Uuid, i64> = state
        .message_repository
        .unread_counts_by_sender(auth.id)
        .await
        .map_err(|e| {
            error!("Failed to load unread counts: {}", e);
            ApiError::InternalServerError
        })?
        .into_iter()
        .collect();

    let partner_ids: Vec<Uuid> = latest.iter().map(|(partner_id, _)| *partner_id).collect();
    let partners: HashMap<Uuid, User> = state
        .user_repository
        .find_by_ids(&partner_ids)
        .await
        .map_err(|e| {
            error!("Failed to resolve partners: {}", e);
            ApiError::InternalServerError
        })?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let conversations: Vec<ConversationResponse> = latest
        .into_iter()
        .filter_map(|(partner_id, message)| {
            partners.get(&partner_id).map(|user| ConversationResponse {
                user: user.clone().into(),
                last_message: message.into(),
                unread_count: unread.get(&partner_id).copied().unwrap_or(0),
            })
        })
        .collect();

    Ok(Json(conversations))
}

/// Total unread messages for the principal
pub async fn get_unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let count = state
        .message_repository
        .unread_total(auth.id)
        .await
        .map_err(|e| {
            error!("Failed to count unread messages: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(UnreadCountResponse { count }))
}

/// Delete a message; only the sender may do this
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let message = state
        .message_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to load message: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;

    if message.sender_id != auth.id {
        return Err(ApiError::Forbidden);
    }

    state.message_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete message: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(json!({"message": "Message deleted successfully"})))
}
