//! Integration tests for the notes endpoints

use super::*;

use noteapp_client::{CreateGroup, CreateNote, UpdateGroup, UpdateNote};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_tree_is_fetched_and_prepared() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/getNotesList"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "groups": [{
                "group_id": 1,
                "group_name": "work",
                "groups": null,
                "notes": [{"note_id": 3, "note_title": "plan"}]
            }],
            "notes": [{"note_id": 4, "note_title": "inbox"}]
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server, Some(TokenSet::new("A1", "R1")));

    let tree = assert_ok!(client.notes().get_tree().await);
    let prepared = tree.prepare();

    let root = &prepared[0];
    assert_eq!(root.title, "Root");
    let children = root.children.as_ref().unwrap();
    assert_eq!(children[0].key, "group-1");
    assert_eq!(children[1].key, "note-4");
    assert_eq!(children[0].children.as_ref().unwrap()[0].title, "plan");
}

#[tokio::test]
async fn test_get_note_by_id() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/getNote"))
        .and(query_param("id", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "group_id": 1,
            "title": "plan",
            "text": "# Plan",
            "user_email": "user@example.com"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server, Some(TokenSet::new("A1", "R1")));

    let note = assert_ok!(client.notes().get_note("12").await);
    assert_eq!(note.id, "12");
    assert_eq!(note.text, "# Plan");
}

#[tokio::test]
async fn test_note_and_group_mutations() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/addNote"))
        .and(body_json(json!({"group_id": "0", "title": "new note"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/updateNote"))
        .and(body_json(json!({"id": "5", "title": "renamed", "text": "body"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/delNote"))
        .and(query_param("id", "5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/addGroup"))
        .and(body_json(json!({"name": "archive", "parentIdGroup": "1"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/updateGroup"))
        .and(body_json(json!({"id": "2", "parentGroupId": "1"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/delGroup"))
        .and(query_param("id", "2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server, Some(TokenSet::new("A1", "R1")));
    let notes = client.notes();

    assert_ok!(
        notes
            .create_note(&CreateNote {
                group_id: "0".to_string(),
                title: "new note".to_string(),
            })
            .await
    );
    assert_ok!(
        notes
            .update_note(&UpdateNote::new("5").title("renamed").text("body"))
            .await
    );
    assert_ok!(notes.delete_note("5").await);
    assert_ok!(
        notes
            .create_group(&CreateGroup {
                name: "archive".to_string(),
                parent_id_group: Some("1".to_string()),
            })
            .await
    );
    assert_ok!(
        notes
            .update_group(&UpdateGroup::Move {
                id: "2".to_string(),
                parent_group_id: "1".to_string(),
            })
            .await
    );
    assert_ok!(notes.delete_group("2").await);
}

#[tokio::test]
async fn test_server_error_is_not_refreshed() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/getNote"))
        .respond_with(error_response(500, "database unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/refresh-token"))
        .respond_with(tokens_response("A2", "R2"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server, Some(TokenSet::new("A1", "R1")));

    let error = client.notes().get_note("1").await.unwrap_err();
    assert_eq!(error.status(), Some(500));
    assert_eq!(client.token_store().get_tokens(), TokenSet::new("A1", "R1"));
}
