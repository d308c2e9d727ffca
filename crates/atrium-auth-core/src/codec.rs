//! Session token codec
//!
//! Encodes, signs, and verifies the self-issued token families (access and
//! refresh) as compact HS256 JWTs. A single symmetric secret signs both
//! families; the scope claim, not token structure, distinguishes them.
//! Callers check scope themselves after verification.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use atrium_types::{Identity, IdentityId, Role, TenantId, TokenScope};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Claims carried by a self-issued token
///
/// Created once at issuance and never mutated. The tenant on a verified
/// claims object is authoritative; it must never be overridden by request
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the identity this token was issued to
    pub sub: IdentityId,
    /// Tenant the identity belongs to
    pub tenant_id: TenantId,
    /// Role within the tenant
    pub role: Role,
    /// Token family: access or refresh
    pub scope: TokenScope,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Expiration timestamp (seconds)
    pub exp: i64,
}

impl TokenClaims {
    /// Stamp claims for an identity with the given scope and lifetime
    pub fn new(identity: &Identity, scope: TokenScope, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: identity.id,
            tenant_id: identity.tenant_id,
            role: identity.role,
            scope,
            iat: now,
            exp: now + ttl.as_secs() as i64,
        }
    }

    /// Check if the claims are expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Codec for the self-issued token families
///
/// Holds the pre-derived signing and verification keys. Verification applies
/// no clock leeway: a token is valid strictly until its expiry second.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec from the configured signing secret
    ///
    /// # Errors
    /// Returns `Configuration` if no secret is configured.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        if config.token_secret.is_empty() {
            return Err(AuthError::Configuration(
                "token signing secret is not configured".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            validation,
        })
    }

    /// Sign claims into a compact token
    pub fn issue(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Configuration(format!("token encoding failed: {e}")))
    }

    /// Verify a token and return its claims
    ///
    /// Returns the decoded claims unconditionally on success; callers must
    /// check `scope` against the operation they are authorizing.
    ///
    /// # Errors
    /// - `InvalidSignature` if the signature does not match (or the token
    ///   was signed under a different algorithm)
    /// - `Expired` if the token is at or past its expiry
    /// - `MalformedToken` if the structure cannot be parsed
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                tracing::debug!("Session token verification failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature
                    | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                }
            },
        )?;

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}
