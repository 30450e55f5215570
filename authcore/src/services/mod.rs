//! Business logic services
//!
//! Services encapsulate the authentication flow and coordinate between
//! the directory, the hasher, and the token issuer.

pub mod auth;


pub use auth::{AuthService, AuthSession};
