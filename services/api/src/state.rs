//! Application state shared across handlers

use std::sync::Arc;

use crate::config::AppConfig;
use crate::jwt::JwtService;
use crate::oauth::OAuthClient;
use crate::password::PasswordService;
use crate::repositories::{
    AchievementRepository, CommentRepository, CourseRepository, FeedbackRepository,
    MediaRepository, MessageRepository, RatingRepository, StatsRepository, TaskRepository,
    UserRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt_service: Arc<JwtService>,
    pub password_service: PasswordService,
    pub oauth_client: Arc<OAuthClient>,
    pub user_repository: UserRepository,
    pub achievement_repository: AchievementRepository,
    pub comment_repository: CommentRepository,
    pub message_repository: MessageRepository,
    pub course_repository: CourseRepository,
    pub task_repository: TaskRepository,
    pub feedback_repository: FeedbackRepository,
    pub rating_repository: RatingRepository,
    pub media_repository: MediaRepository,
    pub stats_repository: StatsRepository,
}
