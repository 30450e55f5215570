//! Authentication error handling
//!
//! This module provides the unified error taxonomy for the core,
//! separating caller-facing classifications from internal detail.

use thiserror::Error;

/// Authentication error returned to the embedding layer
///
/// Classification errors (`Conflict`, `InvalidCredentials`, `Unauthorized`)
/// carry enough for the caller to build a user-facing response. Anything
/// else is logged with full detail internally and surfaced only as
/// `Internal`, whose `Display` never exposes the underlying cause.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("An account with this email already exists")]
    Conflict,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("Internal authentication failure")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Stable machine-readable code for the embedding layer
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::Conflict => "CONFLICT",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_display_hides_detail() {
        let error = AuthError::Internal(anyhow::anyhow!("connection refused to 10.0.0.3:5432"));
        let shown = error.to_string();
        assert_eq!(shown, "Internal authentication failure");
        assert!(!shown.contains("10.0.0.3"));
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AuthError::Conflict.code(), "CONFLICT");
        assert_eq!(AuthError::InvalidCredentials.code(), "INVALID_CREDENTIALS");
        assert_eq!(AuthError::Unauthorized.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_invalid_credentials_message_is_uniform() {
        // The same message regardless of whether the user existed.
        let error = AuthError::InvalidCredentials;
        assert_eq!(error.to_string(), "Invalid credentials");
    }
}
