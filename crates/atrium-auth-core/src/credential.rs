//! Credential verification
//!
//! One-way hash comparison for login secrets. Argon2id is the only scheme
//! accepted; hashes are stored in PHC string format.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

/// Verifies a supplied secret against a stored one-way hash
///
/// Stateless: holds nothing beyond the comparison function. Argon2's
/// verification is constant-time with respect to the candidate password.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialVerifier;

impl CredentialVerifier {
    /// Create a new credential verifier
    pub fn new() -> Self {
        Self
    }

    /// Compare a candidate secret against a stored hash
    ///
    /// A hash that fails to parse counts as a mismatch, not an error; the
    /// login path must not distinguish corrupt rows from wrong passwords.
    pub fn verify(&self, candidate: &str, stored_hash: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(hash) => hash,
            Err(err) => {
                tracing::debug!("Stored credential hash unparseable: {}", err);
                return false;
            }
        };

        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Hash a password for storage
///
/// Used by provisioning tooling and test fixtures; the authentication core
/// itself only ever compares.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_correct_password() {
        let hash = hash_password("correct-pw").unwrap();
        let verifier = CredentialVerifier::new();
        assert!(verifier.verify("correct-pw", &hash));
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("correct-pw").unwrap();
        let verifier = CredentialVerifier::new();
        assert!(!verifier.verify("wrong-pw", &hash));
    }

    #[test]
    fn test_unparseable_hash_is_mismatch() {
        let verifier = CredentialVerifier::new();
        assert!(!verifier.verify("anything", "not-a-phc-string"));
        assert!(!verifier.verify("anything", ""));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }
}
