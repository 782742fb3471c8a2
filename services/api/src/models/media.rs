//! Media metadata models
//!
//! The server never stores media bytes; clients upload directly to the
//! external host with a signed parameter bundle and register the resulting
//! metadata here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MEDIA_TYPE_PHOTO: &str = "PHOTO";
pub const MEDIA_TYPE_VIDEO: &str = "VIDEO";

/// Media metadata entity
#[derive(Debug, Clone, FromRow)]
pub struct Media {
    pub id: Uuid,
    pub public_id: String,
    pub url: String,
    #[sqlx(rename = "type")]
    pub media_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    pub id: Uuid,
    pub public_id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Media> for MediaResponse {
    fn from(media: Media) -> Self {
        MediaResponse {
            id: media.id,
            public_id: media.public_id,
            url: media.url,
            media_type: media.media_type,
            title: media.title,
            description: media.description,
            uploaded_by: media.uploaded_by,
            created_at: media.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaRequest {
    pub public_id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Signed parameter bundle for a direct-to-host upload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSignatureResponse {
    pub timestamp: String,
    pub upload_preset: String,
    pub signature: String,
}
