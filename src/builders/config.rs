//! Configuration Builder
//!
//! Fluent builder for client configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::client::parse_base_url;
use crate::error::{ApiError, ConfigurationError};
use crate::types::{ClientConfig, Endpoints, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "NOTEAPP_API_BASE_URL";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "NOTEAPP_TIMEOUT_SECS";
/// Environment variable holding the durable storage file path.
pub const ENV_STORAGE_PATH: &str = "NOTEAPP_STORAGE_PATH";

/// Client configuration builder.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    refresh_path: Option<String>,
    storage_path: Option<PathBuf>,
}

impl ClientConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder from `NOTEAPP_*` environment variables. Unset
    /// variables keep their defaults.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut builder = Self::new();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            builder = builder.base_url(base_url);
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = timeout.trim().parse().map_err(|_| {
                ApiError::Configuration(ConfigurationError::Environment {
                    message: format!("{} must be a whole number of seconds, got {:?}", ENV_TIMEOUT_SECS, timeout),
                })
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(path) = lookup(ENV_STORAGE_PATH).filter(|path| !path.is_empty()) {
            builder = builder.storage_path(path);
        }

        Ok(builder)
    }

    /// Set the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the refresh-token endpoint path.
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = Some(path.into());
        self
    }

    /// Persist the durable storage scope to this file.
    pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> Result<ClientConfig, ApiError> {
        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        parse_base_url(&base_url)?;

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        if timeout.is_zero() {
            return Err(ApiError::Configuration(ConfigurationError::InvalidConfig {
                message: "timeout must be greater than zero".to_string(),
            }));
        }

        let refresh_path = self
            .refresh_path
            .unwrap_or_else(|| Endpoints::REFRESH_TOKEN.to_string());
        if refresh_path.trim().is_empty() {
            return Err(ApiError::Configuration(ConfigurationError::MissingRequired {
                field: "refresh_path".to_string(),
            }));
        }

        Ok(ClientConfig {
            base_url,
            timeout,
            refresh_path,
            storage_path: self.storage_path,
        })
    }
}

/// Create a new client configuration builder.
pub fn client_config() -> ClientConfigBuilder {
    ClientConfigBuilder::new()
}
