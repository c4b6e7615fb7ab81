//! Environment-driven server configuration.
//!
//! All knobs come from `STOCKBOOK_*` environment variables. Release builds
//! require both signing secrets and the feed api key explicitly; debug
//! builds fall back to ephemeral values so local development needs no
//! setup, at the cost of every restart invalidating outstanding tokens.

use std::env;
use std::net::SocketAddr;

/// Default bind address for local development.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

const ACCESS_SECRET_VAR: &str = "STOCKBOOK_ACCESS_SECRET";
const REFRESH_SECRET_VAR: &str = "STOCKBOOK_REFRESH_SECRET";
const API_KEY_VAR: &str = "STOCKBOOK_API_KEY";
const BIND_ADDR_VAR: &str = "STOCKBOOK_BIND_ADDR";
const COOKIE_SECURE_VAR: &str = "STOCKBOOK_COOKIE_SECURE";

/// Configuration failures preventing startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingSecret(&'static str),
    #[error("{name} is not a valid socket address: {value}")]
    InvalidBindAddr { name: &'static str, value: String },
    #[error("{name} must be `true` or `false`, got: {value}")]
    InvalidFlag { name: &'static str, value: String },
}

/// Resolved runtime configuration.
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub access_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
    pub records_api_key: String,
    pub cookie_secure: bool,
}

impl AppConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var(BIND_ADDR_VAR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr: SocketAddr =
            bind_addr
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr {
                    name: BIND_ADDR_VAR,
                    value: bind_addr.clone(),
                })?;

        let cookie_secure = match env::var(COOKIE_SECURE_VAR) {
            Ok(value) => match value.as_str() {
                "true" => true,
                "false" => false,
                _ => {
                    return Err(ConfigError::InvalidFlag {
                        name: COOKIE_SECURE_VAR,
                        value,
                    });
                }
            },
            Err(_) => true,
        };

        Ok(Self {
            bind_addr,
            access_secret: secret_from_env(ACCESS_SECRET_VAR)?,
            refresh_secret: secret_from_env(REFRESH_SECRET_VAR)?,
            records_api_key: string_secret_from_env(API_KEY_VAR)?,
            cookie_secure,
        })
    }
}

fn secret_from_env(name: &'static str) -> Result<Vec<u8>, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.into_bytes()),
        _ => fallback_secret(name).map(String::into_bytes),
    }
}

fn string_secret_from_env(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => fallback_secret(name),
    }
}

#[cfg(debug_assertions)]
fn fallback_secret(name: &'static str) -> Result<String, ConfigError> {
    use rand::RngCore;
    use tracing::warn;

    warn!(
        variable = name,
        "not set; generating an ephemeral development value"
    );
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

#[cfg(not(debug_assertions))]
fn fallback_secret(name: &'static str) -> Result<String, ConfigError> {
    Err(ConfigError::MissingSecret(name))
}
