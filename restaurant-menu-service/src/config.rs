//! Service configuration.
//!
//! Everything here is read once at startup and shared read-only afterwards.
//! Sources, lowest precedence first: an optional `config` file in the working
//! directory, `MENU__`-prefixed environment variables, and the bare upstream
//! credential variables (`BASE_URL_ECOM_V2`, `AUTHORIZATION`, `UUID`).

use config::{Config, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::error::{ServiceError, ServiceResult, UpstreamError};

/// Environment variable holding the upstream base URL
pub const BASE_URL_VAR: &str = "BASE_URL_ECOM_V2";

/// Environment variable holding the upstream authorization credential
pub const AUTHORIZATION_VAR: &str = "AUTHORIZATION";

/// Environment variable holding the upstream UUID credential
pub const UUID_VAR: &str = "UUID";

/// Top-level service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_server")]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream menu API configuration.
///
/// The credentials are opaque values passed through as request headers.
/// Any of them may be absent at startup; the absence only surfaces as an
/// error when a tool actually needs the upstream.
#[derive(Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub authorization: Option<String>,

    #[serde(default)]
    pub uuid: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Borrowed view of a complete set of upstream credentials
#[derive(Clone, Copy)]
pub struct UpstreamCredentials<'a> {
    pub base_url: &'a str,
    pub authorization: &'a str,
    pub uuid: &'a str,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            authorization: None,
            uuid: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Names of the required variables that are unset or empty
    pub fn missing_vars(&self) -> Vec<&'static str> {
        [
            (BASE_URL_VAR, &self.base_url),
            (AUTHORIZATION_VAR, &self.authorization),
            (UUID_VAR, &self.uuid),
        ]
        .into_iter()
        .filter(|(_, value)| non_empty(value).is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// All three credentials, or a configuration error naming what is missing
    pub fn credentials(&self) -> Result<UpstreamCredentials<'_>, UpstreamError> {
        match (
            non_empty(&self.base_url),
            non_empty(&self.authorization),
            non_empty(&self.uuid),
        ) {
            (Some(base_url), Some(authorization), Some(uuid)) => Ok(UpstreamCredentials {
                base_url,
                authorization,
                uuid,
            }),
            _ => Err(UpstreamError::Configuration {
                missing: self.missing_vars(),
            }),
        }
    }

    /// Log which required variables are present and which are not.
    ///
    /// Only variable names are logged, never values.
    pub fn log_status(&self) {
        let missing = self.missing_vars();
        for name in [BASE_URL_VAR, AUTHORIZATION_VAR, UUID_VAR] {
            if missing.contains(&name) {
                tracing::warn!(variable = name, "Missing environment variable");
            } else {
                tracing::info!(variable = name, "Found environment variable");
            }
        }
    }
}

// Credentials must never reach the logs, even through `{:?}`
impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .field("uuid", &self.uuid.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Load configuration from the config file and the process environment
    pub fn load() -> ServiceResult<Self> {
        Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("MENU")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("upstream.base_url", std::env::var(BASE_URL_VAR).ok())
            .and_then(|b| {
                b.set_override_option(
                    "upstream.authorization",
                    std::env::var(AUTHORIZATION_VAR).ok(),
                )
            })
            .and_then(|b| b.set_override_option("upstream.uuid", std::env::var(UUID_VAR).ok()))
            .map_err(|e| ServiceError::Config {
                message: format!("Failed to apply environment overrides: {}", e),
            })?
            .build()
            .map_err(|e| ServiceError::Config {
                message: format!("Failed to build config: {}", e),
            })?
            .try_deserialize()
            .map_err(|e| ServiceError::Config {
                message: format!("Failed to deserialize config: {}", e),
            })
    }
}

// ==================== Default Value Functions ====================

pub(crate) fn default_server() -> ServerConfig {
    ServerConfig {
        host: default_host(),
        port: default_port(),
    }
}

pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8000
}

pub(crate) fn default_timeout_secs() -> u64 {
    30
}
