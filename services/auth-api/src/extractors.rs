//! Axum extractors for authentication

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use atrium_auth_core::AuthError;
use atrium_types::Identity;

use crate::state::AppState;

/// Authenticated identity extracted from the request
///
/// Rejection is uniform: whatever check failed inside the authenticator,
/// the caller sees the same generic 401.
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub Identity);

impl AuthIdentity {
    /// Check if the identity carries administrative privileges
    pub fn is_admin(&self) -> bool {
        self.0.role.is_admin()
    }
}

/// Error response for auth failures
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    error: AuthErrorDetail,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetail {
    code: &'static str,
    message: &'static str,
}

/// Auth rejection type
pub struct AuthRejection {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
}

impl AuthRejection {
    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "UNAUTHORIZED",
            message: "Unauthorized",
        }
    }

    fn unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: "SERVICE_UNAVAILABLE",
            message: "Service temporarily unavailable",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = AuthErrorResponse {
            error: AuthErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthIdentity
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        match app_state.authenticator.authenticate(authorization).await {
            Ok(Some(identity)) => Ok(AuthIdentity(identity)),
            Ok(None) => Err(AuthRejection::unauthorized()),
            Err(AuthError::DependencyUnavailable(_)) => Err(AuthRejection::unavailable()),
            Err(e) => {
                tracing::error!(error = ?e, "Authenticator failure");
                Err(AuthRejection::unauthorized())
            }
        }
    }
}

/// Admin-only extractor: authenticates, then requires an admin role
#[derive(Debug, Clone)]
#[allow(dead_code)] // Reserved for admin-surface handlers
pub struct AdminIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AdminIdentity
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticated = AuthIdentity::from_request_parts(parts, state).await?;

        if !authenticated.is_admin() {
            return Err(AuthRejection {
                status: StatusCode::FORBIDDEN,
                code: "FORBIDDEN",
                message: "Admin access required",
            });
        }

        Ok(AdminIdentity(authenticated.0))
    }
}
