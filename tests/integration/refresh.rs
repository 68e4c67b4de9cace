//! Integration tests for token refresh

use super::*;
use std::time::Duration;

use futures::future::join_all;
use noteapp_client::{ApiError, RefreshState};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::Mock;

#[tokio::test]
async fn test_expired_token_is_refreshed_and_request_retried() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/getNotesList"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(error_response(401, "token expired"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/refresh-token"))
        .and(body_json(json!({"refreshToken": "R1"})))
        .respond_with(tokens_response("A2", "R2"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/getNotesList"))
        .and(header("Authorization", "Bearer A2"))
        .respond_with(empty_tree())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server, Some(TokenSet::new("A1", "R1")));

    let tree = assert_ok!(client.notes().get_tree().await);
    assert!(tree.groups.is_empty());

    assert_eq!(client.token_store().get_tokens(), TokenSet::new("A2", "R2"));
    assert_eq!(client.refresh_state(), RefreshState::Normal);

    let refresh = mock_server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.url.path() == "/refresh-token")
        .unwrap();
    assert!(refresh.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_missing_refresh_token_fails_without_refresh_call() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/getNotesList"))
        .respond_with(error_response(401, "token expired"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/refresh-token"))
        .respond_with(tokens_response("A2", "R2"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_client(
        &mock_server,
        Some(TokenSet {
            access_token: Some("A1".to_string()),
            refresh_token: None,
            token_type: None,
        }),
    );

    let error = assert_err!(client.notes().get_tree().await);

    assert!(matches!(error, ApiError::Unauthorized { status: 401, .. }));
    assert!(client.token_store().get_tokens().is_empty());
}

#[tokio::test]
async fn test_failed_refresh_clears_tokens_without_looping() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/getNotesList"))
        .respond_with(error_response(401, "token expired"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/refresh-token"))
        .respond_with(error_response(401, "refresh token revoked"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server, Some(TokenSet::new("A1", "R1")));

    let error = assert_err!(client.notes().get_tree().await);

    assert!(error.needs_reauth());
    assert_eq!(error.status(), Some(401));
    assert!(client.token_store().get_tokens().is_empty());
    assert_eq!(client.refresh_stats().failures(), 1);
}

#[tokio::test]
async fn test_unauthorized_retry_is_not_refreshed_again() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/getNotesList"))
        .respond_with(error_response(401, "forbidden note tree"))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/refresh-token"))
        .respond_with(tokens_response("A2", "R2"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server, Some(TokenSet::new("A1", "R1")));

    let error = assert_err!(client.notes().get_tree().await);

    assert!(matches!(error, ApiError::Status { status: 401, .. }));
    assert_eq!(client.token_store().get_tokens(), TokenSet::new("A2", "R2"));
}

#[tokio::test]
async fn test_concurrent_unauthorized_requests_share_one_refresh() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/getNotesList"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(error_response(401, "token expired"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/refresh-token"))
        .respond_with(tokens_response("A2", "R2").set_delay(Duration::from_millis(100)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/getNotesList"))
        .and(header("Authorization", "Bearer A2"))
        .respond_with(empty_tree())
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server, Some(TokenSet::new("A1", "R1")));
    let notes = client.notes();

    let results = join_all((0..3).map(|_| notes.get_tree())).await;

    for result in results {
        assert_ok!(result);
    }
    assert_eq!(client.refresh_stats().attempts(), 1);
    assert_eq!(client.token_store().get_tokens(), TokenSet::new("A2", "R2"));
}
