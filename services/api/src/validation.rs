//! Input validation utilities
//!
//! Rules are intentionally permissive: the platform accepts short passwords
//! and terse addresses, so checks reject only blank or structurally hopeless
//! input rather than enforcing complexity rules.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::media::{MEDIA_TYPE_PHOTO, MEDIA_TYPE_VIDEO};

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() > 64 {
        return Err("Username must be at most 64 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+$").expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate comment text; whitespace-only text counts as empty
pub fn validate_comment_text(text: &str) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err("Comment text cannot be empty".to_string());
    }

    Ok(())
}

/// Validate a star rating
pub fn validate_rating(rating: i32) -> Result<(), String> {
    if !(1..=5).contains(&rating) {
        return Err("Rating must be between 1 and 5".to_string());
    }

    Ok(())
}

/// Validate a media type name
pub fn validate_media_type(media_type: &str) -> Result<(), String> {
    if media_type == MEDIA_TYPE_PHOTO || media_type == MEDIA_TYPE_VIDEO {
        Ok(())
    } else {
        Err(format!("Unknown media type: {}", media_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a@x").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a @x").is_err());
        assert!(validate_email("@x").is_err());
        assert!(validate_email("a@").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("pw1").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_comment_text() {
        assert!(validate_comment_text("nice").is_ok());
        assert!(validate_comment_text("").is_err());
        assert!(validate_comment_text("  \t ").is_err());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_validate_media_type() {
        assert!(validate_media_type("PHOTO").is_ok());
        assert!(validate_media_type("VIDEO").is_ok());
        assert!(validate_media_type("GIF").is_err());
        assert!(validate_media_type("photo").is_err());
    }
}
