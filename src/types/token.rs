//! Token Types
//!
//! Credential and token type definitions for the notes API.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

/// Authorization scheme used when none has been stored.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

fn default_token_type() -> Option<String> {
    Some(DEFAULT_TOKEN_TYPE.to_string())
}

/// The locally persisted token set.
///
/// Every field is optional: an empty set means the user is signed out.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
}

impl TokenSet {
    /// Create a token set with the given access and refresh tokens.
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access_token: Some(access.into()),
            refresh_token: Some(refresh.into()),
            token_type: default_token_type(),
        }
    }

    /// Set the token type.
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Check if no token is held.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.token_type.is_none()
    }

    /// Format as Authorization header value, `<type> <access>`.
    ///
    /// Returns `None` without an access token.
    pub fn authorization_header(&self) -> Option<String> {
        let access = self.access_token.as_deref()?;
        let token_type = self.token_type.as_deref().unwrap_or(DEFAULT_TOKEN_TYPE);
        Some(format!("{} {}", token_type, access))
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |token: &Option<String>| token.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("TokenSet")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Token pair returned by sign-in, sign-up and refresh.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokensResponse {
    pub access_token: String,
    /// Some deployments omit the refresh token on refresh; the old one is kept.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: Option<String>,
}

impl AuthTokensResponse {
    /// Convert into a token set, falling back to `previous_refresh` when the
    /// response carries no refresh token.
    pub fn into_token_set(self, previous_refresh: Option<String>) -> TokenSet {
        TokenSet {
            access_token: Some(self.access_token),
            refresh_token: self.refresh_token.or(previous_refresh),
            token_type: self.token_type.or_else(default_token_type),
        }
    }
}

/// Refresh request body sent to POST /refresh-token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Sign-in / sign-up credentials.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::new(password.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
