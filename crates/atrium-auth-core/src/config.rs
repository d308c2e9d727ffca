//! Configuration types for the authentication core

use std::time::Duration;

/// Google's JWKS distribution endpoint for Pub/Sub push tokens
pub const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Session token configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Symmetric secret signing both token families
    pub token_secret: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
}

impl AuthConfig {
    /// Create a session token config with default lifetimes
    /// (30 minutes access, 7 days refresh)
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: token_secret.into(),
            access_ttl: Duration::from_secs(30 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }

    /// Set access token lifetime
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Set refresh token lifetime
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

// The signing secret stays out of Debug output.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret_len", &self.token_secret.len())
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Pub/Sub push verification configuration
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// Expected audience: the push endpoint URL registered with the
    /// subscription
    pub audience: String,
    /// Expected subject: the service account Google signs push tokens as
    pub service_account: String,
    /// JWKS endpoint for key material
    pub jwks_url: String,
    /// Timeout for a single JWKS fetch
    pub fetch_timeout: Duration,
    /// How long cached keys stay valid without a rotation-triggered refresh
    pub key_cache_ttl: Duration,
}

impl PushConfig {
    /// Create a push config against Google's key distribution endpoint
    pub fn new(audience: impl Into<String>, service_account: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            service_account: service_account.into(),
            jwks_url: GOOGLE_JWKS_URL.to_string(),
            fetch_timeout: Duration::from_secs(10),
            key_cache_ttl: Duration::from_secs(60 * 60),
        }
    }

    /// Override the JWKS endpoint (used by tests against a mock server)
    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    /// Set the JWKS fetch timeout
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the key cache lifetime
    pub fn with_key_cache_ttl(mut self, ttl: Duration) -> Self {
        self.key_cache_ttl = ttl;
        self
    }
}
