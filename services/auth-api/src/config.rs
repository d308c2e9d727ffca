//! Configuration for the Auth API service.

use atrium_auth_core::{AuthConfig, PushConfig};
use std::time::Duration;

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Session token configuration
    pub auth: AuthConfig,

    /// Pub/Sub push verification configuration
    pub push: PushConfig,

    /// How long webhook replay fingerprints are remembered
    pub replay_window: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Token secret (minimum 32 bytes)
        let token_secret =
            std::env::var("TOKEN_SECRET").map_err(|_| ConfigError::Missing("TOKEN_SECRET"))?;

        if token_secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "TOKEN_SECRET must be at least 32 characters",
            ));
        }

        // Token lifetimes (defaults: 30 minutes access, 7 days refresh)
        let access_ttl_minutes: u64 = std::env::var("ACCESS_TOKEN_TTL_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_TTL_MINUTES"))?;

        let refresh_ttl_days: u64 = std::env::var("REFRESH_TOKEN_TTL_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REFRESH_TOKEN_TTL_DAYS"))?;

        let auth = AuthConfig::new(token_secret)
            .with_access_ttl(Duration::from_secs(access_ttl_minutes * 60))
            .with_refresh_ttl(Duration::from_secs(refresh_ttl_days * 24 * 3600));

        // Pub/Sub push verification
        let push_audience = std::env::var("PUSH_AUDIENCE")
            .map_err(|_| ConfigError::Missing("PUSH_AUDIENCE"))?;

        let push_service_account = std::env::var("PUSH_SERVICE_ACCOUNT")
            .map_err(|_| ConfigError::Missing("PUSH_SERVICE_ACCOUNT"))?;

        let mut push = PushConfig::new(push_audience, push_service_account);
        if let Ok(url) = std::env::var("PUSH_JWKS_URL") {
            push = push.with_jwks_url(url);
        }

        // Replay window (default 10 minutes)
        let replay_window_secs: u64 = std::env::var("REPLAY_WINDOW_SECS")
            .unwrap_or_else(|_| "600".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REPLAY_WINDOW_SECS"))?;

        Ok(Self {
            http_port,
            database_url,
            auth,
            push,
            replay_window: Duration::from_secs(replay_window_secs),
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
