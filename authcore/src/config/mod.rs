//! Configuration management for the authentication core
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: AUTH__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Authentication core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token: TokenConfig,
    pub password: PasswordConfig,
}

/// Token signing configuration
///
/// The signing secret is process-wide and immutable for the process
/// lifetime; key rotation means restarting with a new secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl_secs: i64,
}

/// Password policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    pub min_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: TokenConfig {
                secret: "development-secret-change-in-production".to_string(),
                ttl_secs: 3600, // 1 hour
            },
            password: PasswordConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with AUTH__ prefix
    ///    e.g., AUTH__TOKEN__TTL_SECS=7200 sets token.ttl_secs
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AuthConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            .add_source(config::Environment::with_prefix("AUTH").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
