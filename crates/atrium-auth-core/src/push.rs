//! Pub/Sub push token verification
//!
//! Verifies the RS256 JWTs Google attaches to Pub/Sub push deliveries
//! against its rotating public key set. This verifier trusts entirely
//! different key material than the session token codec; the two never share
//! a verification path, so a session token can never authenticate a push
//! delivery or vice versa.
//!
//! Verification is a total function from token to boolean. Signature,
//! audience, issuer, subject, and expiry failures - and key fetch failures -
//! all resolve to `false` (fail-closed); nothing throws past the boundary.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use moka::future::Cache;
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::config::PushConfig;

/// Issuers Google signs push tokens under
pub const ACCEPTED_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

/// Clock skew tolerance for externally-issued tokens (seconds)
const PUSH_TOKEN_LEEWAY_SECS: u64 = 300;

/// JWKS (JSON Web Key Set) structure
#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

/// Individual JWK (JSON Web Key)
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kid: String,
    pub kty: String,
    pub alg: Option<String>,
    pub n: String,
    pub e: String,
}

/// Key fetch failure
#[derive(Debug, thiserror::Error)]
pub enum KeySourceError {
    /// Transport-level failure (timeout, connection refused, bad status)
    #[error("key endpoint unreachable: {0}")]
    Unreachable(String),

    /// Endpoint responded but the body was not a key set
    #[error("key set unparseable: {0}")]
    Unparseable(String),
}

/// Source of the rotating public key set
///
/// Injected into [`PushVerifier`] so tests can substitute a fake; production
/// uses [`HttpKeySource`] against Google's distribution endpoint. The
/// transport is untrusted: authenticity rests on signature verification, not
/// on where the keys came from.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Fetch the current key set
    async fn fetch_keys(&self) -> Result<Jwks, KeySourceError>;
}

/// HTTP key source with a pooled, timeout-bounded client
pub struct HttpKeySource {
    client: reqwest::Client,
    url: String,
}

impl HttpKeySource {
    /// Create a key source for the configured JWKS endpoint
    pub fn new(config: &PushConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(config.fetch_timeout)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .pool_max_idle_per_host(2)
            .tcp_nodelay(true)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            url: config.jwks_url.clone(),
        }
    }

    /// Create a key source sharing an existing HTTP client
    pub fn with_client(config: &PushConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            url: config.jwks_url.clone(),
        }
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch_keys(&self) -> Result<Jwks, KeySourceError> {
        tracing::debug!("Fetching JWKS from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| KeySourceError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(KeySourceError::Unreachable(format!(
                "status {}",
                response.status()
            )));
        }

        response
            .json::<Jwks>()
            .await
            .map_err(|e| KeySourceError::Unparseable(e.to_string()))
    }
}

/// Claims on a Pub/Sub push token
///
/// Audience, issuer, and expiry are checked by the decode validation; only
/// the subject needs a field here for the service-account comparison.
#[derive(Debug, Clone, Deserialize)]
struct PushClaims {
    sub: String,
}

/// Why a push token was rejected
///
/// Collapsed to `false` at the boundary; exists for debug logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reject {
    Malformed,
    MissingKeyId,
    UnknownKeyId,
    KeyUnavailable,
    BadKeyMaterial,
    BadSignature,
    Expired,
    Audience,
    Issuer,
    Subject,
}

/// Verifies Google Pub/Sub push tokens against a cached, rotating key set
///
/// State machine: no key -> fetching -> cached -> re-fetching when a token
/// names an unseen key id. The cache is process-wide and safe for concurrent
/// readers; two callers missing simultaneously may both fetch, and the last
/// write wins without corruption.
pub struct PushVerifier {
    config: PushConfig,
    keys: Arc<dyn KeySource>,
    key_cache: Cache<String, Arc<DecodingKey>>,
}

impl PushVerifier {
    /// Create a verifier fetching keys over HTTP
    pub fn new(config: PushConfig) -> Self {
        let source = Arc::new(HttpKeySource::new(&config));
        Self::with_key_source(config, source)
    }

    /// Create a verifier with an injected key source
    pub fn with_key_source(config: PushConfig, keys: Arc<dyn KeySource>) -> Self {
        let key_cache = Cache::builder()
            .time_to_live(config.key_cache_ttl)
            .max_capacity(100)
            .build();

        Self {
            config,
            keys,
            key_cache,
        }
    }

    /// Verify a push token
    ///
    /// Total: any failing check (structure, key lookup, signature, audience,
    /// issuer, subject, expiry) and any key fetch failure resolve to `false`.
    pub async fn verify(&self, token: &str) -> bool {
        match self.authorize(token).await {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(reason = ?reason, "Push token rejected");
                false
            }
        }
    }

    async fn authorize(&self, token: &str) -> Result<(), Reject> {
        // The unverified header only supplies the key id; every claim is
        // checked again under the verified decode below
        let header = decode_header(token).map_err(|_| Reject::Malformed)?;
        let kid = header.kid.ok_or(Reject::MissingKeyId)?;

        let decoding_key = self.get_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = PUSH_TOKEN_LEEWAY_SECS;
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&ACCEPTED_ISSUERS);

        let data = decode::<PushClaims>(token, &decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Reject::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidAudience => Reject::Audience,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => Reject::Issuer,
                jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => Reject::BadSignature,
                _ => Reject::Malformed,
            }
        })?;

        // Constant-time comparison of the service account identifier
        let subject_matches: bool = data
            .claims
            .sub
            .as_bytes()
            .ct_eq(self.config.service_account.as_bytes())
            .into();

        if !subject_matches {
            return Err(Reject::Subject);
        }

        Ok(())
    }

    /// Get a decoding key for the given kid
    ///
    /// A kid not in the cache triggers exactly one re-fetch that replaces
    /// the cached set, tolerating key rotation. If the kid is still absent
    /// after that fetch, the token is rejected without fetching again.
    async fn get_key(&self, kid: &str) -> Result<Arc<DecodingKey>, Reject> {
        if let Some(key) = self.key_cache.get(kid).await {
            return Ok(key);
        }

        let jwks = self.keys.fetch_keys().await.map_err(|e| {
            tracing::error!("JWKS fetch failed: {}", e);
            Reject::KeyUnavailable
        })?;

        // Replace the cached set wholesale; rotated-out keys disappear
        self.key_cache.invalidate_all();

        let mut requested = None;
        for jwk in &jwks.keys {
            match DecodingKey::from_rsa_components(&jwk.n, &jwk.e) {
                Ok(dk) => {
                    let dk = Arc::new(dk);
                    if jwk.kid == kid {
                        requested = Some(Arc::clone(&dk));
                    }
                    self.key_cache.insert(jwk.kid.clone(), dk).await;
                }
                Err(e) => {
                    tracing::error!(kid = %jwk.kid, "Unusable key in JWKS: {}", e);
                    if jwk.kid == kid {
                        return Err(Reject::BadKeyMaterial);
                    }
                }
            }
        }

        requested.ok_or(Reject::UnknownKeyId)
    }

    /// Drop all cached keys, forcing a fetch on the next verification
    pub async fn invalidate_cache(&self) {
        self.key_cache.invalidate_all();
    }
}

impl std::fmt::Debug for PushVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushVerifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
