//! Authentication handlers (login, refresh, me)

use axum::extract::State;
use axum::Json;

use atrium_types::{Identity, LoginRequest, RefreshRequest, TokenPair};

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthIdentity;
use crate::state::AppState;

/// POST /api/auth/login
///
/// Authenticate credentials and return a token pair. Unknown identity and
/// wrong password produce the same response.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    let pair = state.issuer.login(&req.email, &req.password).await?;
    Ok(Json(pair))
}

/// POST /api/auth/refresh
///
/// Exchange a refresh token for a new pair.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    if req.refresh_token.is_empty() {
        return Err(ApiError::BadRequest(
            "refresh_token is required".to_string(),
        ));
    }

    let pair = state.issuer.refresh(&req.refresh_token).await?;
    Ok(Json(pair))
}

/// GET /api/auth/me
///
/// Return the identity behind the presented access token.
pub async fn me(AuthIdentity(identity): AuthIdentity) -> ApiResult<Json<Identity>> {
    Ok(Json(identity))
}
