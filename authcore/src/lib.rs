//! Authcore — credential-based authentication core
//!
//! Registers user identities, verifies credentials, and issues/validates
//! the bearer tokens downstream routes trust for authorization.
//!
//! ## Architecture
//!
//! The core follows a layered design:
//! - Services: the signup/signin/authorize orchestration
//! - Auth: password hashing (argon2) and token issuance/validation (JWT)
//! - Directory: the identity-store boundary the core consumes
//!
//! HTTP routing, persistence, and process bootstrap are external
//! collaborators; embedders inject a [`directory::UserDirectory`]
//! implementation and thread the returned [`auth::AuthContext`] into
//! their handlers.

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod services;

pub use auth::{AuthContext, TokenService};
pub use config::AuthConfig;
pub use directory::{Identity, PublicIdentity, UserDirectory};
pub use error::{AuthError, AuthResult};
pub use services::{AuthService, AuthSession};
