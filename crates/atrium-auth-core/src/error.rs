//! Auth errors

use thiserror::Error;

/// Authentication errors
///
/// Codec-level variants (`MalformedToken`, `InvalidSignature`, `Expired`)
/// never cross the request boundary: the issuer and authenticator convert
/// them to their own outcomes before returning.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Bad credentials on the login path
    ///
    /// Deliberately covers both "unknown identity" and "wrong password" so
    /// callers cannot enumerate accounts.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Refresh token failed verification or carried the wrong scope
    #[error("invalid refresh token")]
    InvalidRefreshToken,

    /// Identity behind a refresh token is gone or deactivated
    #[error("account inactive")]
    InactiveAccount,

    /// Token structure could not be parsed
    #[error("malformed token")]
    MalformedToken,

    /// Token signature did not match
    #[error("invalid signature")]
    InvalidSignature,

    /// Token has expired
    #[error("token expired")]
    Expired,

    /// Identity store or key endpoint unreachable
    ///
    /// Distinct from the credential failures above so callers can tell
    /// outage from attack.
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// Configuration error (missing or unusable signing secret)
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::AuthenticationFailed
            | Self::InvalidRefreshToken
            | Self::InactiveAccount
            | Self::MalformedToken
            | Self::InvalidSignature
            | Self::Expired => 401,
            Self::DependencyUnavailable(_) => 503,
            Self::Configuration(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::InactiveAccount => "INACTIVE_ACCOUNT",
            Self::MalformedToken => "MALFORMED_TOKEN",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::Expired => "TOKEN_EXPIRED",
            Self::DependencyUnavailable(_) => "DEPENDENCY_UNAVAILABLE",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<atrium_db::DbError> for AuthError {
    fn from(err: atrium_db::DbError) -> Self {
        tracing::error!("Identity store error: {}", err);
        Self::DependencyUnavailable(err.to_string())
    }
}
