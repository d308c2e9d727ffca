//! Token wire types

use serde::{Deserialize, Serialize};

/// Token family marker carried inside claims
///
/// Not an OAuth permission scope: marks whether a token authenticates API
/// requests or mints new token pairs. Scope confusion (presenting a refresh
/// token where an access token is required) is a checkable condition, not a
/// parsing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    /// Short-lived token authorizing API requests
    Access,
    /// Longer-lived token exchanged for a new pair
    Refresh,
}

impl std::fmt::Display for TokenScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// Refresh request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token from a previous login or refresh
    pub refresh_token: String,
}

/// Signed access/refresh token pair
///
/// Ephemeral: returned once to the caller and never persisted server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (authenticates API requests)
    pub access_token: String,
    /// Refresh token (mints the next pair)
    pub refresh_token: String,
    /// Always "bearer"
    pub token_type: String,
}

impl TokenPair {
    /// Build a bearer token pair
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}
