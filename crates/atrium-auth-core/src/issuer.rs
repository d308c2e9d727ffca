//! Session issuance
//!
//! Orchestrates credential verification and the token codec to mint
//! access/refresh pairs, and to rotate a pair from a valid refresh token.

use std::sync::Arc;

use atrium_db::IdentityRepository;
use atrium_types::{Identity, TokenPair, TokenScope};

use crate::codec::{TokenClaims, TokenCodec};
use crate::config::AuthConfig;
use crate::credential::CredentialVerifier;
use crate::error::AuthError;

/// Issues session token pairs for authenticated identities
///
/// Refresh rotation note: every successful `refresh` mints a brand-new pair
/// but the previous refresh token is not revoked (there is no revocation
/// store). A leaked refresh token therefore stays usable until its natural
/// expiry. Known limitation, kept deliberately.
pub struct SessionIssuer<R: IdentityRepository> {
    config: AuthConfig,
    codec: TokenCodec,
    credentials: CredentialVerifier,
    identities: Arc<R>,
}

impl<R: IdentityRepository> SessionIssuer<R> {
    /// Create a new session issuer
    ///
    /// # Errors
    /// Returns `Configuration` if the signing secret is not configured.
    pub fn new(config: AuthConfig, identities: Arc<R>) -> Result<Self, AuthError> {
        let codec = TokenCodec::new(&config)?;
        Ok(Self {
            config,
            codec,
            credentials: CredentialVerifier::new(),
            identities,
        })
    }

    /// Authenticate credentials and issue a token pair
    ///
    /// Unknown identity, deactivated identity, and wrong password all fail
    /// with the same `AuthenticationFailed`; only a store outage is
    /// reported differently (`DependencyUnavailable`).
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let row = match self.identities.find_by_email(email).await? {
            Some(row) => row,
            None => {
                tracing::debug!("Login rejected: unknown identity");
                return Err(AuthError::AuthenticationFailed);
            }
        };

        if !row.active {
            tracing::debug!("Login rejected: identity inactive");
            return Err(AuthError::AuthenticationFailed);
        }

        if !self.credentials.verify(password, &row.password_hash) {
            tracing::debug!("Login rejected: credential mismatch");
            return Err(AuthError::AuthenticationFailed);
        }

        self.issue_pair(&row.to_identity())
    }

    /// Exchange a refresh token for a brand-new pair
    ///
    /// The identity is re-resolved from the store so role and tenant on the
    /// new pair reflect current state, and deactivated accounts stop
    /// refreshing immediately.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .codec
            .verify(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        if claims.scope != TokenScope::Refresh {
            tracing::debug!("Refresh rejected: wrong token scope");
            return Err(AuthError::InvalidRefreshToken);
        }

        let row = self.identities.find_by_id(claims.sub.0).await?;
        match row {
            Some(row) if row.active => self.issue_pair(&row.to_identity()),
            _ => {
                tracing::debug!("Refresh rejected: identity missing or inactive");
                Err(AuthError::InactiveAccount)
            }
        }
    }

    fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, AuthError> {
        let access = TokenClaims::new(identity, TokenScope::Access, self.config.access_ttl);
        let refresh = TokenClaims::new(identity, TokenScope::Refresh, self.config.refresh_ttl);

        Ok(TokenPair::bearer(
            self.codec.issue(&access)?,
            self.codec.issue(&refresh)?,
        ))
    }
}

impl<R: IdentityRepository> std::fmt::Debug for SessionIssuer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
