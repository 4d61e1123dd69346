//! Password hashing with argon2id.
//!
//! The vault is stateless: it hashes and verifies, nothing else.
//! Verification returns `false` for a mismatch or an unparseable hash —
//! it never errors on the expected negative path.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use mnemo_core::{Error, Result};

/// Salted, slow password hashing for local accounts.
///
/// Argon2id with the crate's default parameters: memory-hard enough to
/// resist offline brute force while staying inside interactive login
/// latency.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialVault;

impl CredentialVault {
    /// Create a new credential vault.
    pub fn new() -> Self {
        Self
    }

    /// Hash a password into a PHC-format string with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::Internal(format!("password hashing failed: {e}")))
    }

    /// Verify a password against a stored hash.
    ///
    /// Returns `false` on mismatch and on a hash that fails to parse.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
