//! Authentication primitives
//!
//! Provides JWT-based tokens with argon2 password hashing.

mod password;
mod token;

pub use password::PasswordService;
pub use token::{AuthContext, Claims, TokenKeys, TokenService};
