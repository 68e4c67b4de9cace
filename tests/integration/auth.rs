//! Integration tests for sign-in, sign-up and logout

use super::*;

use noteapp_client::{AuthObserver, Credentials, Navigator};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::Mock;

#[derive(Default)]
struct CountingNavigator {
    visits: AtomicUsize,
}

impl Navigator for CountingNavigator {
    fn navigate_to_login(&self) {
        self.visits.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_login_then_authorized_request() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/sign-in"))
        .and(body_json(json!({"email": "user@example.com", "password": "hunter2"})))
        .respond_with(tokens_response("A1", "R1"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/getNotesList"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(empty_tree())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server, None);

    assert_ok!(
        client
            .auth()
            .login(&Credentials::new("user@example.com", "hunter2"))
            .await
    );
    assert_ok!(client.notes().get_tree().await);

    let sign_in = &mock_server.received_requests().await.unwrap()[0];
    assert!(sign_in.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_registration_error_is_passed_through() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/sign-up"))
        .respond_with(error_response(400, "user already exists"))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server, None);

    let error = assert_err!(
        client
            .auth()
            .registration(&Credentials::new("user@example.com", "hunter2"))
            .await
    );

    assert_eq!(error.status(), Some(400));
    assert!(error.to_string().contains("user already exists"));
    assert!(client.token_store().get_tokens().is_empty());
}

#[tokio::test]
async fn test_logout_navigates_to_login() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/logout"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(wiremock::ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server, Some(TokenSet::new("A1", "R1")));
    let navigator = Arc::new(CountingNavigator::default());
    let observer = AuthObserver::mount(client.token_store(), navigator.clone());
    assert!(observer.is_authenticated());

    assert_ok!(client.auth().logout().await);

    assert!(!observer.is_authenticated());
    assert_eq!(navigator.visits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_tokens_survive_restart_with_file_storage() {
    let mock_server = setup_mock_server().await;
    let dir = tempfile::tempdir().unwrap();
    let storage_path = dir.path().join("noteapp.json");

    Mock::given(method("POST"))
        .and(path("/sign-in"))
        .respond_with(tokens_response("A1", "R1"))
        .mount(&mock_server)
        .await;

    let config = client_config()
        .base_url(mock_server.uri())
        .storage_path(&storage_path)
        .build()
        .unwrap();

    let client = ApiClient::new(config.clone()).unwrap();
    assert_ok!(
        client
            .auth()
            .login(&Credentials::new("user@example.com", "hunter2"))
            .await
    );
    drop(client);

    let restarted = ApiClient::new(config).unwrap();
    assert_eq!(restarted.token_store().get_tokens(), TokenSet::new("A1", "R1"));

    let on_disk = std::fs::read_to_string(&storage_path).unwrap();
    assert!(!on_disk.contains("access_token"));
}
