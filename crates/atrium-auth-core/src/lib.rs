//! Atrium Auth Core - Authentication business logic
//!
//! Token-based authentication for a multi-tenant system:
//! - Session token issuance and refresh (HS256 access/refresh pairs)
//! - Request authentication against the identity store
//! - Independent verification of Google Pub/Sub push tokens (RS256, JWKS)
//!
//! The two token families trust entirely separate key material. Self-issued
//! tokens are signed with a shared symmetric secret; push tokens are verified
//! against Google's rotating public key set. There is no shared verification
//! path between them.

pub mod authenticator;
pub mod codec;
pub mod config;
pub mod credential;
pub mod error;
pub mod issuer;
pub mod push;

pub use authenticator::RequestAuthenticator;
pub use codec::{TokenClaims, TokenCodec};
pub use config::{AuthConfig, PushConfig, GOOGLE_JWKS_URL};
pub use credential::{hash_password, CredentialVerifier};
pub use error::AuthError;
pub use issuer::SessionIssuer;
pub use push::{HttpKeySource, Jwk, Jwks, KeySource, KeySourceError, PushVerifier};
