//! Builders
//!
//! Fluent builder for client configuration.

pub mod config;

pub use config::{client_config, ClientConfigBuilder, ENV_BASE_URL, ENV_STORAGE_PATH, ENV_TIMEOUT_SECS};
