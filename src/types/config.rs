//! Configuration Types
//!
//! Notes API client configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default configuration values.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Notes API client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base address every endpoint path is appended to.
    pub base_url: String,
    /// HTTP timeout.
    pub timeout: Duration,
    /// Path of the refresh-token exchange.
    pub refresh_path: String,
    /// File backing the durable storage scope. `None` keeps durable
    /// entries in memory.
    pub storage_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            refresh_path: Endpoints::REFRESH_TOKEN.to_string(),
            storage_path: None,
        }
    }
}

/// API endpoint paths.
pub struct Endpoints;

impl Endpoints {
    pub const SIGN_IN: &'static str = "/sign-in";
    pub const SIGN_UP: &'static str = "/sign-up";
    pub const LOGOUT: &'static str = "/logout";
    pub const REFRESH_TOKEN: &'static str = "/refresh-token";
    pub const NOTES_LIST: &'static str = "/getNotesList";
    pub const NOTE: &'static str = "/getNote";
    pub const ADD_NOTE: &'static str = "/addNote";
    pub const UPDATE_NOTE: &'static str = "/updateNote";
    pub const DELETE_NOTE: &'static str = "/delNote";
    pub const ADD_GROUP: &'static str = "/addGroup";
    pub const UPDATE_GROUP: &'static str = "/updateGroup";
    pub const DELETE_GROUP: &'static str = "/delGroup";
}
