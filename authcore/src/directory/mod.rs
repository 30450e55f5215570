//! User directory boundary
//!
//! The directory is the only writer of identity records. The core consumes
//! it through the [`UserDirectory`] trait; the store behind it (SQL,
//! document DB, in-memory) is an external concern as long as it enforces
//! email uniqueness atomically.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

mod memory;

pub use memory::InMemoryDirectory;

/// Identity record as held by the directory
///
/// The password hash is a [`SecretString`]: it never appears in `Debug`
/// output and the type deliberately has no `Serialize` impl, so a record
/// cannot cross the boundary with its hash attached by accident.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: SecretString,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Redacted projection safe to return to callers
    pub fn to_public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Identity without credential material
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicIdentity {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an identity
///
/// Carries the already-derived password hash; plaintext never reaches the
/// directory.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password_hash: SecretString,
    pub name: Option<String>,
}

/// Directory failure modes
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("An identity with this email already exists")]
    Conflict,

    #[error("Directory operation failed")]
    Internal(#[from] anyhow::Error),
}

/// Store interface the authentication core consumes
///
/// Implementations must enforce email uniqueness atomically: two
/// concurrent `create` calls for the same email result in exactly one
/// success and one [`DirectoryError::Conflict`]. Email comparison is
/// byte-exact; the directory performs no case normalization.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up an identity by its exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DirectoryError>;

    /// Create a new identity, failing with `Conflict` on a duplicate email
    async fn create(&self, new: NewIdentity) -> Result<Identity, DirectoryError>;
}

/// Build an identity with fixed credentials for unit tests
#[cfg(test)]
pub fn test_identity(email: &str) -> Identity {
    let now = Utc::now();
    Identity {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: SecretString::new("$argon2id$test$hash".to_string()),
        name: None,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_debug_output_redacts_password_hash() {
        let identity = test_identity("debug@example.com");
        let debug_str = format!("{:?}", identity);
        assert!(!debug_str.contains("argon2id"));
        assert!(debug_str.contains("debug@example.com"));
    }

    #[test]
    fn test_public_projection_strips_hash() {
        let identity = test_identity("public@example.com");
        let public = identity.to_public();
        let json = serde_json::to_value(&public).unwrap();

        assert_eq!(json["email"], "public@example.com");
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2id"));
    }

    #[test]
    fn test_hash_still_reachable_inside_the_boundary() {
        // The hasher needs the raw value; only serialization is blocked.
        let identity = test_identity("expose@example.com");
        assert_eq!(identity.password_hash.expose_secret(), "$argon2id$test$hash");
    }
}
