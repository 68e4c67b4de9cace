//! Request Types
//!
//! Per-request description consumed by the API client.

use serde::Serialize;

use crate::core::HttpMethod;
use crate::error::{ApiError, ProtocolError};

/// A request against the notes API, relative to the configured base URL.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
    /// Attach the stored access token. Disabled for sign-in, sign-up and the
    /// refresh exchange itself.
    pub include_auth_token: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            include_auth_token: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let encoded = serde_json::to_string(body).map_err(|e| {
            ApiError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })?;
        self.body = Some(encoded);
        Ok(self)
    }

    /// Skip the Authorization header for this request.
    pub fn without_auth(mut self) -> Self {
        self.include_auth_token = false;
        self
    }
}
