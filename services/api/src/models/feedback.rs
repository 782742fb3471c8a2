//! Feedback model with status workflow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle states of a feedback entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStatus {
    Pending,
    Reviewed,
    Resolved,
    Rejected,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "PENDING",
            FeedbackStatus::Reviewed => "REVIEWED",
            FeedbackStatus::Resolved => "RESOLVED",
            FeedbackStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "PENDING" => Ok(FeedbackStatus::Pending),
            "REVIEWED" => Ok(FeedbackStatus::Reviewed),
            "RESOLVED" => Ok(FeedbackStatus::Resolved),
            "REJECTED" => Ok(FeedbackStatus::Rejected),
            other => Err(format!("Unknown feedback status: {}", other)),
        }
    }

    /// States an admin may move an entry into
    pub fn parse_transition(value: &str) -> Result<Self, String> {
        match Self::parse(value)? {
            FeedbackStatus::Pending => Err("Feedback cannot be moved back to PENDING".to_string()),
            status => Ok(status),
        }
    }
}

/// Feedback entity
#[derive(Debug, Clone, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(rename = "type")]
    pub feedback_type: String,
    pub rating: i32,
    pub status: String,
    pub admin_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Feedback projection with submitter and course context resolved at read
/// time; the names are None when the referenced rows no longer exist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub feedback_type: String,
    pub rating: i32,
    pub status: String,
    pub admin_response: Option<String>,
    pub user_id: Uuid,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub course_id: Option<Uuid>,
    pub course_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub feedback_type: String,
    pub rating: i32,
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub feedback_type: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackStatusRequest {
    pub status: String,
    pub admin_response: Option<String>,
}

/// Pagination and sorting parameters for feedback listings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub direction: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackListResponse {
    pub items: Vec<FeedbackResponse>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

/// Counts per status plus the mean rating over all feedback
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStatsResponse {
    pub total: i64,
    pub pending: i64,
    pub reviewed: i64,
    pub resolved: i64,
    pub rejected: i64,
    pub average_rating: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_round_trip() {
        for status in [
            FeedbackStatus::Pending,
            FeedbackStatus::Reviewed,
            FeedbackStatus::Resolved,
            FeedbackStatus::Rejected,
        ] {
            assert_eq!(FeedbackStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert!(FeedbackStatus::parse("OPEN").is_err());
    }

    #[test]
    fn test_status_transition_rejects_pending() {
        assert!(FeedbackStatus::parse_transition("PENDING").is_err());
        assert_eq!(
            FeedbackStatus::parse_transition("RESOLVED").unwrap(),
            FeedbackStatus::Resolved
        );
    }
}
