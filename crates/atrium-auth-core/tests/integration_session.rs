//! Integration tests for session issuance, refresh, and request
//! authentication against an in-memory identity store.

mod common;

use std::sync::Arc;

use atrium_auth_core::{
    hash_password, AuthConfig, AuthError, RequestAuthenticator, SessionIssuer, TokenCodec,
};
use atrium_db::IdentityRepository;
use atrium_types::{IdentityId, Role, TenantId, TokenScope};
use common::MockIdentityRepository;

const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

fn test_config() -> AuthConfig {
    AuthConfig::new(TEST_SECRET)
}

struct Harness {
    store: MockIdentityRepository,
    issuer: SessionIssuer<MockIdentityRepository>,
    authenticator: RequestAuthenticator<MockIdentityRepository>,
    codec: TokenCodec,
}

impl Harness {
    fn new() -> Self {
        let store = MockIdentityRepository::new();
        let identities = Arc::new(store.clone());
        let config = test_config();
        Self {
            store,
            issuer: SessionIssuer::new(config.clone(), Arc::clone(&identities)).unwrap(),
            authenticator: RequestAuthenticator::new(&config, identities).unwrap(),
            codec: TokenCodec::new(&config).unwrap(),
        }
    }

    /// Insert an active owner identity and return its row id/tenant id
    fn seed_owner(&self, email: &str, password: &str) -> (uuid::Uuid, uuid::Uuid) {
        let hash = hash_password(password).unwrap();
        let row = MockIdentityRepository::identity_row(email, "owner", &hash);
        let (id, tenant) = (row.id, row.tenant_id);
        self.store.insert(row);
        (id, tenant)
    }
}

#[tokio::test]
async fn test_login_issues_access_claims() {
    let h = Harness::new();
    let (id, tenant) = h.seed_owner("u1@example.com", "correct-pw");

    let pair = h.issuer.login("u1@example.com", "correct-pw").await.unwrap();
    assert_eq!(pair.token_type, "bearer");

    let claims = h.codec.verify(&pair.access_token).unwrap();
    assert_eq!(claims.sub, IdentityId::from(id));
    assert_eq!(claims.tenant_id, TenantId::from(tenant));
    assert_eq!(claims.role, Role::Owner);
    assert_eq!(claims.scope, TokenScope::Access);
    assert_eq!(claims.exp - claims.iat, 1800);
}

#[tokio::test]
async fn test_login_then_authenticate_roundtrip() {
    let h = Harness::new();
    let (id, tenant) = h.seed_owner("u1@example.com", "correct-pw");

    let pair = h.issuer.login("u1@example.com", "correct-pw").await.unwrap();
    let header = format!("Bearer {}", pair.access_token);

    let identity = h
        .authenticator
        .authenticate(Some(&header))
        .await
        .unwrap()
        .expect("access token should authenticate");

    assert_eq!(identity.id, IdentityId::from(id));
    assert_eq!(identity.tenant_id, TenantId::from(tenant));
    assert_eq!(identity.role, Role::Owner);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = Harness::new();
    let (id, _) = h.seed_owner("known@example.com", "correct-pw");

    // Unknown identity
    let unknown = h.issuer.login("nobody@example.com", "correct-pw").await;
    assert!(matches!(unknown, Err(AuthError::AuthenticationFailed)));

    // Wrong password
    let wrong = h.issuer.login("known@example.com", "wrong-pw").await;
    assert!(matches!(wrong, Err(AuthError::AuthenticationFailed)));

    // Deactivated account, right password
    h.store.deactivate(id);
    let inactive = h.issuer.login("known@example.com", "correct-pw").await;
    assert!(matches!(inactive, Err(AuthError::AuthenticationFailed)));
}

#[tokio::test]
async fn test_refresh_token_does_not_authenticate_requests() {
    let h = Harness::new();
    h.seed_owner("u1@example.com", "correct-pw");

    let pair = h.issuer.login("u1@example.com", "correct-pw").await.unwrap();

    // The refresh token is well-formed and unexpired; only its scope is wrong
    let claims = h.codec.verify(&pair.refresh_token).unwrap();
    assert_eq!(claims.scope, TokenScope::Refresh);

    let header = format!("Bearer {}", pair.refresh_token);
    let result = h.authenticator.authenticate(Some(&header)).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_authenticate_rejections_collapse_to_none() {
    let h = Harness::new();
    let (id, _) = h.seed_owner("u1@example.com", "correct-pw");
    let pair = h.issuer.login("u1@example.com", "correct-pw").await.unwrap();

    // No header
    assert!(h.authenticator.authenticate(None).await.unwrap().is_none());

    // Non-bearer scheme
    assert!(h
        .authenticator
        .authenticate(Some("Basic dXNlcjpwdw=="))
        .await
        .unwrap()
        .is_none());

    // Garbage token
    assert!(h
        .authenticator
        .authenticate(Some("Bearer not-a-token"))
        .await
        .unwrap()
        .is_none());

    // Valid token, deactivated identity
    h.store.deactivate(id);
    let header = format!("Bearer {}", pair.access_token);
    assert!(h
        .authenticator
        .authenticate(Some(&header))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_expired_access_token_rejected() {
    let h = Harness::new();
    let (id, _) = h.seed_owner("u1@example.com", "correct-pw");

    // Mint an access token whose expiry is two minutes in the past; the
    // claims are otherwise perfectly valid for a stored, active identity
    let row = h.store.find_by_id(id).await.unwrap().unwrap();
    let mut claims = atrium_auth_core::TokenClaims::new(
        &row.to_identity(),
        TokenScope::Access,
        std::time::Duration::from_secs(0),
    );
    claims.iat -= 240;
    claims.exp -= 120;
    let token = h.codec.issue(&claims).unwrap();

    let header = format!("Bearer {token}");
    let result = h.authenticator.authenticate(Some(&header)).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_refresh_rotates_pair() {
    let h = Harness::new();
    let (id, tenant) = h.seed_owner("u1@example.com", "correct-pw");

    let first = h.issuer.login("u1@example.com", "correct-pw").await.unwrap();
    let second = h.issuer.refresh(&first.refresh_token).await.unwrap();

    let claims = h.codec.verify(&second.access_token).unwrap();
    assert_eq!(claims.sub, IdentityId::from(id));
    assert_eq!(claims.tenant_id, TenantId::from(tenant));
    assert_eq!(claims.scope, TokenScope::Access);

    // No revocation store: the previous refresh token remains usable until
    // natural expiry. Documented limitation, asserted so a silent "fix"
    // shows up as a test failure.
    let third = h.issuer.refresh(&first.refresh_token).await;
    assert!(third.is_ok());
}

#[tokio::test]
async fn test_refresh_rejects_access_scope() {
    let h = Harness::new();
    h.seed_owner("u1@example.com", "correct-pw");

    let pair = h.issuer.login("u1@example.com", "correct-pw").await.unwrap();
    let result = h.issuer.refresh(&pair.access_token).await;
    assert!(matches!(result, Err(AuthError::InvalidRefreshToken)));
}

#[tokio::test]
async fn test_refresh_rejects_wrong_secret() {
    let h = Harness::new();
    h.seed_owner("u1@example.com", "correct-pw");

    // A pair minted by an issuer holding a different secret
    let other_config = AuthConfig::new("a-completely-different-signing-secret!!");
    let other_issuer =
        SessionIssuer::new(other_config, Arc::new(h.store.clone())).unwrap();
    let foreign = other_issuer
        .login("u1@example.com", "correct-pw")
        .await
        .unwrap();

    let result = h.issuer.refresh(&foreign.refresh_token).await;
    assert!(matches!(result, Err(AuthError::InvalidRefreshToken)));
}

#[tokio::test]
async fn test_refresh_rejects_malformed_token() {
    let h = Harness::new();
    let result = h.issuer.refresh("definitely.not.ajwt").await;
    assert!(matches!(result, Err(AuthError::InvalidRefreshToken)));
}

#[tokio::test]
async fn test_refresh_inactive_account() {
    let h = Harness::new();
    let (id, _) = h.seed_owner("u1@example.com", "correct-pw");

    let pair = h.issuer.login("u1@example.com", "correct-pw").await.unwrap();

    h.store.deactivate(id);
    let result = h.issuer.refresh(&pair.refresh_token).await;
    assert!(matches!(result, Err(AuthError::InactiveAccount)));
}

#[tokio::test]
async fn test_store_outage_is_distinct_from_bad_credentials() {
    let h = Harness::new();
    h.seed_owner("u1@example.com", "correct-pw");
    let pair = h.issuer.login("u1@example.com", "correct-pw").await.unwrap();

    h.store.set_unavailable(true);

    let login = h.issuer.login("u1@example.com", "correct-pw").await;
    assert!(matches!(login, Err(AuthError::DependencyUnavailable(_))));

    let header = format!("Bearer {}", pair.access_token);
    let authn = h.authenticator.authenticate(Some(&header)).await;
    assert!(matches!(authn, Err(AuthError::DependencyUnavailable(_))));

    let refresh = h.issuer.refresh(&pair.refresh_token).await;
    assert!(matches!(refresh, Err(AuthError::DependencyUnavailable(_))));
}

#[tokio::test]
async fn test_identity_state_read_fresh_on_every_check() {
    let h = Harness::new();
    let (id, _) = h.seed_owner("u1@example.com", "correct-pw");
    let pair = h.issuer.login("u1@example.com", "correct-pw").await.unwrap();
    let header = format!("Bearer {}", pair.access_token);

    assert!(h
        .authenticator
        .authenticate(Some(&header))
        .await
        .unwrap()
        .is_some());

    // Deactivation takes effect on the very next check, token unchanged
    h.store.deactivate(id);
    assert!(h
        .authenticator
        .authenticate(Some(&header))
        .await
        .unwrap()
        .is_none());
}
