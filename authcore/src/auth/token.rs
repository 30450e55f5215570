//! JWT token issuance and validation
//!
//! Tokens are self-contained: claims carry the identity id and email, so
//! validation never goes back to the user directory. A deleted or changed
//! identity therefore stays valid until its token expires; that staleness
//! window is accepted by design.
//!
//! Keys are pre-computed once at startup and wrapped in `Arc` for cheap
//! cloning across tasks.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::TokenConfig;
use crate::directory::Identity;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity ID)
    pub sub: String,
    /// Email of the identity at issuance time
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Authenticated identity recovered from a validated token
///
/// Constructed fresh per validated request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
}

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so they are built once and shared.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl TokenKeys {
    /// Create new keys from the process signing secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Token service for issuing and validating access tokens
///
/// Design: uses pre-computed keys to avoid expensive key derivation on
/// every call. Signing is pure computation; the service holds no state
/// about issued tokens.
#[derive(Clone)]
pub struct TokenService {
    keys: TokenKeys,
    ttl_secs: i64,
}

impl TokenService {
    /// Create a new token service with pre-computed keys
    ///
    /// Call this once at application startup, not per request.
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            keys: TokenKeys::new(secret),
            ttl_secs,
        }
    }

    /// Create from pre-computed keys (for sharing across services)
    pub fn from_keys(keys: TokenKeys, ttl_secs: i64) -> Self {
        Self { keys, ttl_secs }
    }

    /// Create from loaded configuration
    pub fn from_config(config: &TokenConfig) -> Self {
        Self::new(&config.secret, config.ttl_secs)
    }

    /// Issue an access token for an identity
    ///
    /// Embeds `{sub, email}` plus issued-at and expiry. Two calls for the
    /// same identity may differ only in timestamps; HS256 signing itself
    /// is deterministic.
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.ttl_secs);

        let claims = Claims {
            sub: identity.id.to_string(),
            email: identity.email.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }

    /// Validate a token and reconstruct the authenticated identity
    ///
    /// Fails if the signature does not verify, the token is malformed or
    /// truncated, the `sub`/`email` claims are missing, or expiry has
    /// passed. The error carries internal detail for logging; callers
    /// collapse it into a single unauthorized classification before it
    /// crosses the boundary.
    pub fn validate(&self, token: &str) -> Result<AuthContext> {
        let token_data = decode::<Claims>(token, self.keys.decoding(), &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        let claims = token_data.claims;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| anyhow::anyhow!("Invalid subject claim: not an identity id"))?;

        Ok(AuthContext {
            user_id,
            email: claims.email,
        })
    }

    /// Token lifetime in seconds
    #[inline]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Get the pre-computed keys (for sharing)
    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::test_identity;

    fn create_test_service() -> TokenService {
        TokenService::new("test-secret", 3600)
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let service = create_test_service();
        let identity = test_identity("round@example.com");

        let token = service.issue(&identity).unwrap();
        let context = service.validate(&token).unwrap();

        assert_eq!(context.user_id, identity.id);
        assert_eq!(context.email, identity.email);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative TTL puts expiry beyond the validator's leeway.
        let service = TokenService::new("test-secret", -120);
        let identity = test_identity("expired@example.com");

        let token = service.issue(&identity).unwrap();
        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_token_from_other_key_rejected() {
        let issuer = TokenService::new("key-one", 3600);
        let validator = TokenService::new("key-two", 3600);
        let identity = test_identity("keys@example.com");

        let token = issuer.issue(&identity).unwrap();
        assert!(validator.validate(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = create_test_service();
        let identity = test_identity("tamper@example.com");

        let token = service.issue(&identity).unwrap();
        let mut tampered = token.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert!(service.validate(&tampered).is_err());
    }

    #[test]
    fn test_token_missing_email_claim_rejected() {
        // A token signed with the right key but without the email claim
        // must not validate.
        #[derive(serde::Serialize)]
        struct BareClaims {
            sub: String,
            exp: i64,
            iat: i64,
        }

        let service = create_test_service();
        let now = Utc::now().timestamp();
        let claims = BareClaims {
            sub: Uuid::new_v4().to_string(),
            exp: now + 3600,
            iat: now,
        };
        let token = encode(&Header::default(), &claims, service.keys().encoding()).unwrap();

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = create_test_service();
        assert!(service.validate("").is_err());
        assert!(service.validate("not.a.jwt").is_err());
        assert!(service.validate("onlyonepart").is_err());
    }

    #[test]
    fn test_service_from_config() {
        let config = TokenConfig {
            secret: "test-secret".to_string(),
            ttl_secs: 1800,
        };
        let service = TokenService::from_config(&config);
        assert_eq!(service.ttl_secs(), 1800);

        let identity = test_identity("config@example.com");
        let token = service.issue(&identity).unwrap();
        assert!(service.validate(&token).is_ok());
    }

    #[test]
    fn test_service_is_clone_cheap() {
        let service = create_test_service();
        let _cloned = service.clone(); // Arc increments only
    }

    #[test]
    fn test_keys_can_be_shared() {
        let service = create_test_service();
        let service2 = TokenService::from_keys(service.keys().clone(), service.ttl_secs());
        let identity = test_identity("shared@example.com");

        let token = service.issue(&identity).unwrap();
        let context = service2.validate(&token).unwrap();
        assert_eq!(context.user_id, identity.id);
    }
}
