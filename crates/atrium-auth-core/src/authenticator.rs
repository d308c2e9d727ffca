//! Request authentication
//!
//! Resolves a bearer token from an inbound request to a live identity.
//! Every rejection collapses to `None` at the boundary so unauthenticated
//! callers learn nothing about which check failed; the reasons exist only
//! as an internal enum for debug logging.

use std::sync::Arc;

use atrium_db::IdentityRepository;
use atrium_types::{Identity, TokenScope};

use crate::codec::TokenCodec;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Why a request failed to authenticate
///
/// Never leaves this module except through debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reject {
    MissingBearer,
    Verification,
    WrongScope,
    UnknownIdentity,
    Inactive,
}

/// Authenticates inbound requests against the identity store
pub struct RequestAuthenticator<R: IdentityRepository> {
    codec: TokenCodec,
    identities: Arc<R>,
}

impl<R: IdentityRepository> RequestAuthenticator<R> {
    /// Create a new request authenticator
    ///
    /// # Errors
    /// Returns `Configuration` if the signing secret is not configured.
    pub fn new(config: &AuthConfig, identities: Arc<R>) -> Result<Self, AuthError> {
        Ok(Self {
            codec: TokenCodec::new(config)?,
            identities,
        })
    }

    /// Resolve an `Authorization` header to an identity
    ///
    /// Returns `Ok(None)` uniformly when no bearer token is present, the
    /// token fails verification, the scope is not `access`, or the resolved
    /// identity is unknown or inactive. Callers must translate `None` into a
    /// generic unauthorized signal without detail.
    ///
    /// The identity is loaded fresh from the store on every call; only a
    /// store outage is a distinct outcome (`DependencyUnavailable`).
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<Option<Identity>, AuthError> {
        match self.check(authorization).await {
            Ok(identity) => Ok(Some(identity)),
            Err(Outcome::Rejected(reason)) => {
                tracing::debug!(reason = ?reason, "Request authentication rejected");
                Ok(None)
            }
            Err(Outcome::Unavailable(e)) => Err(e),
        }
    }

    async fn check(&self, authorization: Option<&str>) -> Result<Identity, Outcome> {
        let token = authorization
            .and_then(|h| h.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
            .ok_or(Outcome::Rejected(Reject::MissingBearer))?;

        let claims = self
            .codec
            .verify(token)
            .map_err(|_| Outcome::Rejected(Reject::Verification))?;

        // Only access tokens authenticate requests; a valid refresh token
        // here is a scope confusion, not a parse failure
        if claims.scope != TokenScope::Access {
            return Err(Outcome::Rejected(Reject::WrongScope));
        }

        let row = self
            .identities
            .find_by_id(claims.sub.0)
            .await
            .map_err(|e| Outcome::Unavailable(e.into()))?
            .ok_or(Outcome::Rejected(Reject::UnknownIdentity))?;

        if !row.active {
            return Err(Outcome::Rejected(Reject::Inactive));
        }

        Ok(row.to_identity())
    }
}

enum Outcome {
    Rejected(Reject),
    Unavailable(AuthError),
}

impl<R: IdentityRepository> std::fmt::Debug for RequestAuthenticator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAuthenticator").finish_non_exhaustive()
    }
}
