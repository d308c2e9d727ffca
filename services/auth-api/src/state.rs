//! Application state

use std::sync::Arc;

use atrium_auth_core::{PushVerifier, RequestAuthenticator, SessionIssuer};
use atrium_db::{DbPool, PgIdentityRepository};
use moka::future::Cache;

use crate::config::Config;

/// Type aliases for the core services with the concrete repository type
pub type IssuerImpl = SessionIssuer<PgIdentityRepository>;
pub type AuthenticatorImpl = RequestAuthenticator<PgIdentityRepository>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Session issuance (login, refresh)
    pub issuer: Arc<IssuerImpl>,
    /// Request authentication
    pub authenticator: Arc<AuthenticatorImpl>,
    /// Pub/Sub push token verification
    pub push: Arc<PushVerifier>,
    /// Recently seen webhook fingerprints (replay suppression)
    pub replay: Cache<String, ()>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, pool: DbPool) -> Result<Self, atrium_auth_core::AuthError> {
        let identities = Arc::new(PgIdentityRepository::new(pool));

        let issuer = SessionIssuer::new(config.auth.clone(), Arc::clone(&identities))?;
        let authenticator = RequestAuthenticator::new(&config.auth, identities)?;
        let push = PushVerifier::new(config.push.clone());

        let replay = Cache::builder()
            .time_to_live(config.replay_window)
            .max_capacity(100_000)
            .build();

        Ok(Self {
            issuer: Arc::new(issuer),
            authenticator: Arc::new(authenticator),
            push: Arc::new(push),
            replay,
            config: Arc::new(config),
        })
    }
}
