//! Shared fixtures for API integration tests.
//!
//! Spawns the real router on an ephemeral port with in-memory
//! collaborators, keeping typed handles to the mocks so tests can force
//! purge stages to fail.

use std::sync::Arc;

use mnemo_api::services::purge::PurgeConfig;
use mnemo_api::{router, AppState};
use mnemo_auth::{CredentialVault, IdentityManager, TokenService};
use mnemo_core::{ExtractionService, StubExtraction};
use mnemo_index::MockVectorIndex;
use mnemo_store::{MockObjectStorage, Store};

pub const TEST_TOKEN_SECRET: &[u8] = b"integration-test-secret";

pub struct TestServer {
    pub base_url: String,
    pub index: Arc<MockVectorIndex>,
    pub objects: Arc<MockObjectStorage>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Build a test server backed by fresh in-memory state.
pub async fn spawn_test_server() -> TestServer {
    let store = Store::new();
    let identity = Arc::new(IdentityManager::new(
        store.users.clone(),
        CredentialVault::new(),
        TokenService::new(TEST_TOKEN_SECRET),
    ));
    let index = Arc::new(MockVectorIndex::new());
    let objects = Arc::new(MockObjectStorage::new());
    let extraction: Arc<dyn ExtractionService> = Arc::new(StubExtraction);

    let state = AppState::new(
        store,
        identity,
        extraction,
        objects.clone(),
        index.clone(),
        PurgeConfig::default(),
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        index,
        objects,
    }
}

/// Sign up a fresh user, returning `(token, user json)`.
pub async fn signup(
    client: &reqwest::Client,
    server: &TestServer,
    email: &str,
    password: &str,
    name: &str,
) -> (String, serde_json::Value) {
    let resp = client
        .post(server.url("/auth/signup"))
        .json(&serde_json::json!({
            "email": email,
            "password": password,
            "name": name,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201, "signup should succeed");
    let body: serde_json::Value = resp.json().await.unwrap();
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"].clone(),
    )
}

/// Ingest a text note as the given bearer, returning the note json.
pub async fn ingest_text(
    client: &reqwest::Client,
    server: &TestServer,
    token: &str,
    title: &str,
    content: &str,
) -> serde_json::Value {
    let resp = client
        .post(server.url("/ingest"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "mode": "text",
            "title": title,
            "content": content,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201, "ingest should succeed");
    resp.json().await.unwrap()
}
