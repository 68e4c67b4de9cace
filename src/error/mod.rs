//! Client Error Types
//!
//! Error hierarchy for the notes API client.
//!
//! Transport failures and non-success responses propagate unchanged. The one
//! normalized case is [`ApiError::Unauthorized`], produced when a 401 could
//! not be recovered by a token refresh.

use std::time::Duration;
use thiserror::Error;

/// HTTP status reported by a normalized authorization failure.
pub const UNAUTHORIZED_STATUS: u16 = 401;

/// Root error type for the notes API client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A 401 that could not be recovered. Local tokens have been cleared.
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { message: String, status: u16 },

    /// Any other non-success response, passed through as received.
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: String,
    },
}

impl ApiError {
    /// Build the normalized authorization failure.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            status: UNAUTHORIZED_STATUS,
        }
    }

    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "NOTEAPP_CONFIG",
            Self::Network(_) => "NOTEAPP_NETWORK",
            Self::Protocol(_) => "NOTEAPP_PROTOCOL",
            Self::Unauthorized { .. } => "NOTEAPP_UNAUTHORIZED",
            Self::Status { .. } => "NOTEAPP_STATUS",
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the user has to sign in again.
    pub fn needs_reauth(&self) -> bool {
        match self {
            Self::Unauthorized { .. } => true,
            Self::Status { status, .. } => *status == UNAUTHORIZED_STATUS,
            _ => false,
        }
    }

    /// Check if the error came from the transport rather than the server.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("Environment error: {message}")]
    Environment { message: String },
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Request could not be built: {message}")]
    InvalidRequest { message: String },
}

/// Protocol/response parsing error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },
}

/// Storage backend error.
///
/// Never returned by the encoded storage wrapper; backends report it and the
/// wrapper logs and swallows it.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Read failed: {message}")]
    ReadFailed { message: String },

    #[error("Write failed: {message}")]
    WriteFailed { message: String },

    #[error("Corrupted data: {message}")]
    CorruptedData { message: String },
}

/// Result type for client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error body returned by the notes backend.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// Parse error response from HTTP body.
pub fn parse_error_response(body: &str) -> Option<ApiErrorResponse> {
    serde_json::from_str(body).ok()
}

/// Create error from a non-success HTTP response.
pub fn create_error_from_response(status: u16, status_text: &str, body: &str) -> ApiError {
    let message = match parse_error_response(body) {
        Some(response) => response.error,
        None if !status_text.is_empty() => status_text.to_string(),
        None => format!("HTTP {}", status),
    };

    ApiError::Status {
        status,
        message,
        body: body.to_string(),
    }
}

/// Get user-friendly error message.
pub fn get_user_message(error: &ApiError) -> String {
    match error {
        ApiError::Unauthorized { .. } => "Your session has expired. Please sign in again.".to_string(),
        ApiError::Network(NetworkError::Timeout { .. }) => {
            "The request timed out. Please check your connection and try again.".to_string()
        }
        ApiError::Network(_) => {
            "The server could not be reached. Please check your connection.".to_string()
        }
        ApiError::Status { status, message, .. } if (400..500).contains(status) => message.clone(),
        ApiError::Status { .. } => {
            "The notes service is temporarily unavailable. Please try again later.".to_string()
        }
        _ => "An unexpected error occurred. Please try again.".to_string(),
    }
}
