use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod error;
mod jwt;
mod middleware;
mod models;
mod oauth;
mod password;
mod repositories;
mod routes;
mod state;
mod upload;
mod validation;

use std::sync::Arc;

use common::database::{DatabaseConfig, init_pool};
use tokio::net::TcpListener;

use crate::{
    config::AppConfig,
    jwt::{JwtConfig, JwtService},
    oauth::{GoogleOAuthConfig, OAuthClient},
    password::PasswordService,
    repositories::{
        AchievementRepository, CommentRepository, CourseRepository, FeedbackRepository,
        MediaRepository, MessageRepository, RatingRepository, StatsRepository, TaskRepository,
        UserRepository,
    },
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("api=info,tower_http=info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting API service");

    let config = AppConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply pending migrations
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations applied");

    // Initialize services
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(&jwt_config);

    let oauth_config = GoogleOAuthConfig::from_env()?;
    let oauth_client = OAuthClient::new(&oauth_config)?;

    let password_service = PasswordService::new(config.password_hash_cost)?;

    // Initialize repositories
    let user_repository = UserRepository::new(pool.clone());
    let achievement_repository = AchievementRepository::new(pool.clone());
    let comment_repository = CommentRepository::new(pool.clone());
    let message_repository = MessageRepository::new(pool.clone());
    let course_repository = CourseRepository::new(pool.clone());
    let task_repository = TaskRepository::new(pool.clone());
    let feedback_repository = FeedbackRepository::new(pool.clone());
    let rating_repository = RatingRepository::new(pool.clone());
    let media_repository = MediaRepository::new(pool.clone());
    let stats_repository = StatsRepository::new(pool);

    let server_addr = config.server_addr.clone();

    let app_state = AppState {
        config: Arc::new(config),
        jwt_service: Arc::new(jwt_service),
        password_service,
        oauth_client: Arc::new(oauth_client),
        user_repository,
        achievement_repository,
        comment_repository,
        message_repository,
        course_repository,
        task_repository,
        feedback_repository,
        rating_repository,
        media_repository,
        stats_repository,
    };

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&server_addr).await?;
    info!("API service listening on {}", server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
