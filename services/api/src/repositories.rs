//! Repositories for database operations

pub mod achievement;
pub mod comment;
pub mod course;
pub mod feedback;
pub mod media;
pub mod message;
pub mod rating;
pub mod stats;
pub mod task;
pub mod user;

pub use achievement::AchievementRepository;
pub use comment::CommentRepository;
pub use course::CourseRepository;
pub use feedback::FeedbackRepository;
pub use media::MediaRepository;
pub use message::MessageRepository;
pub use rating::RatingRepository;
pub use stats::StatsRepository;
pub use task::TaskRepository;
pub use user::UserRepository;
