//! Authentication orchestration
//!
//! Composes the user directory, the password hasher, and the token
//! service into signup, signin, and authorize operations. Every operation
//! is a self-contained transaction; the service holds no mutable state, so
//! calls may run fully in parallel.
//!
//! # Performance
//!
//! - Password hashing/verification runs on the blocking thread pool
//! - Token keys are pre-computed (cheap clone via Arc)

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use validator::ValidateEmail;

use crate::auth::{AuthContext, PasswordService, TokenService};
use crate::config::PasswordConfig;
use crate::directory::{DirectoryError, NewIdentity, PublicIdentity, UserDirectory};
use crate::error::AuthError;

/// Result of a successful signup or signin
///
/// The identity is always the redacted projection; no code path hands a
/// password hash back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub identity: PublicIdentity,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Authentication service
///
/// Collaborators are injected at construction: the directory as a trait
/// object (any store that enforces email uniqueness), the token service
/// with its pre-computed keys.
pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    tokens: TokenService,
    password_policy: PasswordConfig,
}

impl AuthService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        tokens: TokenService,
        password_policy: PasswordConfig,
    ) -> Self {
        Self {
            directory,
            tokens,
            password_policy,
        }
    }

    /// Register a new identity and issue its first token
    ///
    /// Fails with `Conflict` if the email is already registered, whether
    /// detected by the pre-check or by the directory's atomic uniqueness
    /// guarantee on create.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthSession, AuthError> {
        info!(email = %email, "Signing up new user");

        if !email.validate_email() {
            return Err(AuthError::Validation("Invalid email format".to_string()));
        }
        if password.len() < self.password_policy.min_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.password_policy.min_length
            )));
        }

        let existing = self.directory.find_by_email(email).await.map_err(|e| {
            error!(email = %email, error = %e, "Directory lookup failed during signup");
            AuthError::Internal(e.into())
        })?;
        if existing.is_some() {
            warn!(email = %email, "Signup rejected: email already registered");
            return Err(AuthError::Conflict);
        }

        // Hash on the blocking pool; plaintext is dropped after this call.
        let password_hash = PasswordService::hash_async(password.to_string())
            .await
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                AuthError::Internal(e)
            })?;

        let identity = self
            .directory
            .create(NewIdentity {
                email: email.to_string(),
                password_hash: SecretString::new(password_hash),
                name: name.map(str::to_string),
            })
            .await
            .map_err(|e| match e {
                DirectoryError::Conflict => {
                    // Lost a concurrent race; same outcome as the pre-check.
                    warn!(email = %email, "Signup rejected: email already registered");
                    AuthError::Conflict
                }
                DirectoryError::Internal(e) => {
                    error!(email = %email, error = %e, "Directory create failed");
                    AuthError::Internal(e)
                }
            })?;

        info!(user_id = %identity.id, "User created successfully");
        self.session(identity)
    }

    /// Authenticate existing credentials and issue a token
    ///
    /// "No such user" and "wrong password" are deliberately merged into
    /// one `InvalidCredentials` outcome so callers cannot enumerate
    /// accounts; only the internal log distinguishes them.
    pub async fn signin(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        info!(email = %email, "Attempting sign in");

        let identity = match self.directory.find_by_email(email).await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                debug!(email = %email, "Sign in failed: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(email = %email, error = %e, "Directory lookup failed during signin");
                return Err(AuthError::Internal(e.into()));
            }
        };

        let stored_hash = identity.password_hash.expose_secret().to_string();
        let valid = match PasswordService::verify_async(password.to_string(), stored_hash).await {
            Ok(valid) => valid,
            Err(e) => {
                // Malformed stored hash; treated as a failed match.
                warn!(user_id = %identity.id, error = %e, "Stored password hash unreadable");
                false
            }
        };

        if !valid {
            warn!(email = %email, "Invalid password attempt");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %identity.id, "User signed in successfully");
        self.session(identity)
    }

    /// Validate a bearer token and recover the authenticated identity
    ///
    /// Signature failure, expiry, and malformed tokens are all surfaced as
    /// the same `Unauthorized` classification; the distinction lives only
    /// in the debug log.
    pub fn authorize(&self, token: &str) -> Result<AuthContext, AuthError> {
        self.tokens.validate(token).map_err(|e| {
            debug!(error = %e, "Token validation failed");
            AuthError::Unauthorized
        })
    }

    fn session(&self, identity: crate::directory::Identity) -> Result<AuthSession, AuthError> {
        let access_token = self.tokens.issue(&identity).map_err(|e| {
            error!(user_id = %identity.id, error = %e, "Token issuance failed");
            AuthError::Internal(e)
        })?;

        Ok(AuthSession {
            identity: identity.to_public(),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.ttl_secs(),
        })
    }
}
