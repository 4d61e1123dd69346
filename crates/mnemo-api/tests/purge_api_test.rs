//! Integration tests for the permanent-delete endpoint: the full purge
//! protocol, the ownership precondition, and fail-closed retention when
//! a stage is forced to fail.

mod helpers;

use helpers::{ingest_text, signup, spawn_test_server};

async fn list_total(client: &reqwest::Client, server: &helpers::TestServer, token: &str) -> u64 {
    let resp = client
        .get(server.url("/memory?filter=all"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    body["total"].as_u64().unwrap()
}

#[tokio::test]
async fn test_full_lifecycle_scenario() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();

    // U signs up and ingests a text note
    let (token, user) = signup(&client, &server, "a@x.com", "p4ssword", "Alice").await;
    let note = ingest_text(&client, &server, &token, "T", "hello").await;
    assert_eq!(note["owner_id"], user["id"]);
    assert_eq!(note["extracted_text"], "hello");
    assert_eq!(note["lifecycle_state"], "active");
    let id = note["id"].as_str().unwrap();

    // Recycle, restore
    let resp = client
        .delete(server.url(&format!("/memory/{id}/soft")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "moved_to_recycle_bin");

    let resp = client
        .post(server.url(&format!("/memory/{id}/restore")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "restored");

    // Permanent delete reports every stage
    let resp = client
        .delete(server.url(&format!("/memory/{id}/permanent")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "erased_permanently");
    assert_eq!(body["cleanup_report"]["vector_index"], "purged");
    assert_eq!(body["cleanup_report"]["object_storage"], "skipped");
    assert_eq!(body["cleanup_report"]["metadata"], "purged");

    // Follow-up list is empty, and the note is not restorable
    assert_eq!(list_total(&client, &server, &token).await, 0);
    let resp = client
        .post(server.url(&format!("/memory/{id}/restore")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn test_purge_file_note_reports_storage_purged() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();
    let (token, _) = signup(&client, &server, "a@x.com", "p4ssword", "Alice").await;

    let resp = client
        .post(server.url("/ingest"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "mode": "file",
            "title": "Doc",
            "file": {
                "name": "doc.txt",
                "mime_type": "text/plain",
                "data": "aGVsbG8gd29ybGQ=",
            },
        }))
        .send()
        .await
        .unwrap();
    let note: serde_json::Value = resp.json().await.unwrap();
    let id = note["id"].as_str().unwrap();
    let url = note["original_file"]["url"].as_str().unwrap().to_string();

    let resp = client
        .delete(server.url(&format!("/memory/{id}/permanent")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["cleanup_report"]["object_storage"], "purged");

    use mnemo_store::ObjectStorage;
    assert!(!server.objects.exists(&url).await.unwrap());
}

#[tokio::test]
async fn test_purge_of_unowned_note_is_403() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();
    let (token_a, _) = signup(&client, &server, "a@x.com", "p4ssword", "Alice").await;
    let (token_b, _) = signup(&client, &server, "b@x.com", "p4ssword", "Bob").await;
    let note = ingest_text(&client, &server, &token_a, "T", "mine").await;
    let id = note["id"].as_str().unwrap();

    let resp = client
        .delete(server.url(&format!("/memory/{id}/permanent")))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    // Still fully present for the owner
    assert_eq!(list_total(&client, &server, &token_a).await, 1);
}

#[tokio::test]
async fn test_double_purge_second_call_is_403() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();
    let (token, _) = signup(&client, &server, "a@x.com", "p4ssword", "Alice").await;
    let note = ingest_text(&client, &server, &token, "T", "x").await;
    let id = note["id"].as_str().unwrap();

    let resp = client
        .delete(server.url(&format!("/memory/{id}/permanent")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = client
        .delete(server.url(&format!("/memory/{id}/permanent")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn test_forced_vector_failure_preserves_data_and_says_so() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();
    let (token, _) = signup(&client, &server, "a@x.com", "p4ssword", "Alice").await;
    let note = ingest_text(&client, &server, &token, "T", "precious").await;
    let id = note["id"].as_str().unwrap();

    server.index.fail_purges(true);
    let resp = client
        .delete(server.url(&format!("/memory/{id}/permanent")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "cleanup failed, data preserved");
    assert_eq!(body["stage"], "vector_index");
    // The underlying stage error is logged, not echoed
    assert!(!body.to_string().contains("induced"));

    // Metadata retained and still addressable
    assert_eq!(list_total(&client, &server, &token).await, 1);

    // Retry succeeds once the collaborator recovers
    server.index.fail_purges(false);
    let resp = client
        .delete(server.url(&format!("/memory/{id}/permanent")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(list_total(&client, &server, &token).await, 0);
}

#[tokio::test]
async fn test_forced_storage_failure_preserves_metadata() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();
    let (token, _) = signup(&client, &server, "a@x.com", "p4ssword", "Alice").await;

    let resp = client
        .post(server.url("/ingest"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "mode": "file",
            "title": "Doc",
            "file": {
                "name": "doc.txt",
                "mime_type": "text/plain",
                "data": "aGVsbG8gd29ybGQ=",
            },
        }))
        .send()
        .await
        .unwrap();
    let note: serde_json::Value = resp.json().await.unwrap();
    let id = note["id"].as_str().unwrap();

    server.objects.fail_deletes(true);
    let resp = client
        .delete(server.url(&format!("/memory/{id}/permanent")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "cleanup failed, data preserved");
    assert_eq!(body["stage"], "object_storage");

    // Never a partial "erased" success: the note is still listed
    assert_eq!(list_total(&client, &server, &token).await, 1);
}
