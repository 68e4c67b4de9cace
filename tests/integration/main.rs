//! Integration tests using WireMock
//!
//! These tests run the client over the reqwest transport against a mock
//! notes backend, covering token attachment, refresh-and-retry and the
//! notes endpoints.

mod auth;
mod notes;
mod refresh;

use std::sync::Arc;

use noteapp_client::{client_config, ApiClient, EncodedStorage, TokenSet};
use wiremock::{MockServer, ResponseTemplate};

/// Helper to create a mock server.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Helper to create a client pointing at the mock server, optionally
/// signed in with `tokens`.
pub fn create_client(server: &MockServer, tokens: Option<TokenSet>) -> ApiClient {
    let config = client_config()
        .base_url(server.uri())
        .build()
        .expect("Failed to build config");
    let client = ApiClient::with_storage(config, Arc::new(EncodedStorage::in_memory()))
        .expect("Failed to build client");
    if let Some(tokens) = tokens {
        client.token_store().set_tokens(&tokens);
    }
    client
}

/// Helper to create token pair responses.
pub fn tokens_response(access: &str, refresh: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "accessToken": access,
        "refreshToken": refresh,
    }))
}

/// Helper to create error response templates.
pub fn error_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(serde_json::json!({ "error": message }))
}

/// Helper to create an empty notes tree response.
pub fn empty_tree() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "groups": [], "notes": [] }))
}
