//! Password hashing using argon2
//!
//! One-way credential hashing for the signup path and constant-time
//! verification for signin. Every hash embeds a fresh random salt in its
//! PHC string, so equal plaintexts never produce equal outputs.
//!
//! # Performance Considerations
//!
//! Argon2 is intentionally CPU-intensive. In async contexts use the
//! `_async` variants, which run on the blocking thread pool.

use anyhow::Result;
use argon2::{
    password_hash::{self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier,
        SaltString},
    Argon2,
};

/// Password hashing service
///
/// Argon2id with the crate's recommended parameters; resistant to both
/// side-channel and GPU-based attacks.
pub struct PasswordService;

fn hasher() -> Argon2<'static> {
    Argon2::default()
}

impl PasswordService {
    /// Derive a salted hash for a plaintext password (blocking operation)
    ///
    /// The only failure mode is the underlying hasher refusing to produce
    /// output (entropy or parameter failure); callers treat that as fatal
    /// to the operation in flight.
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a plaintext password against a stored hash (blocking operation)
    ///
    /// A mismatch is `Ok(false)`, never an error; comparison is
    /// constant-time within argon2's verifier. `Err` is reserved for a
    /// stored hash that cannot be parsed or verified at all, which callers
    /// log and treat as a failed match.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
        match hasher().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(anyhow::anyhow!("Password verification failed: {}", e)),
        }
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}
