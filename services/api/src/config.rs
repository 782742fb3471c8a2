//! Application configuration loaded from environment variables

use anyhow::Result;
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub server_addr: String,
    /// Base URL of the frontend, used for OAuth redirects
    pub frontend_url: String,
    /// Origins allowed by the CORS layer
    pub cors_allowed_origins: Vec<String>,
    /// API secret shared with the external media host
    pub upload_api_secret: String,
    /// Upload preset name signed into upload parameter bundles
    pub upload_preset: String,
    /// Argon2 time cost for newly hashed passwords
    pub password_hash_cost: u32,
    /// Username of the bootstrap admin account
    pub admin_username: String,
    /// Password of the bootstrap admin account
    pub admin_password: String,
    /// Email of the bootstrap admin account
    pub admin_email: String,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SERVER_ADDR`: bind address (default: 0.0.0.0:8080)
    /// - `FRONTEND_URL`: frontend base URL (default: http://localhost:3000)
    /// - `CORS_ALLOWED_ORIGINS`: comma-separated origins (default: the frontend URL)
    /// - `UPLOAD_API_SECRET`: media host API secret (required)
    /// - `UPLOAD_PRESET`: media host upload preset (default: ml_default)
    /// - `PASSWORD_HASH_COST`: Argon2 time cost (default: 2)
    /// - `ADMIN_USERNAME` / `ADMIN_PASSWORD` / `ADMIN_EMAIL`: bootstrap admin
    ///   credentials (defaults: admin / password / admin@example.com)
    pub fn from_env() -> Result<Self> {
        let server_addr =
            env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| frontend_url.clone())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let upload_api_secret = env::var("UPLOAD_API_SECRET")
            .map_err(|_| anyhow::anyhow!("UPLOAD_API_SECRET environment variable not set"))?;

        let upload_preset =
            env::var("UPLOAD_PRESET").unwrap_or_else(|_| "ml_default".to_string());

        let password_hash_cost = env::var("PASSWORD_HASH_COST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2);

        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "password".to_string());
        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());

        Ok(AppConfig {
            server_addr,
            frontend_url,
            cors_allowed_origins,
            upload_api_secret,
            upload_preset,
            password_hash_cost,
            admin_username,
            admin_password,
            admin_email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "SERVER_ADDR",
            "FRONTEND_URL",
            "CORS_ALLOWED_ORIGINS",
            "UPLOAD_API_SECRET",
            "UPLOAD_PRESET",
            "PASSWORD_HASH_COST",
            "ADMIN_USERNAME",
            "ADMIN_PASSWORD",
            "ADMIN_EMAIL",
        ] {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env();
        unsafe {
            std::env::set_var("UPLOAD_API_SECRET", "secret");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:8080");
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.upload_preset, "ml_default");
        assert_eq!(config.password_hash_cost, 2);
        assert_eq!(config.admin_username, "admin");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_requires_upload_secret() {
        clear_env();
        assert!(AppConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_config_parses_origin_list() {
        clear_env();
        unsafe {
            std::env::set_var("UPLOAD_API_SECRET", "secret");
            std::env::set_var(
                "CORS_ALLOWED_ORIGINS",
                "http://localhost:3000, https://app.example.com",
            );
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:3000", "https://app.example.com"]
        );

        clear_env();
    }
}
