//! Shared fixtures for handler tests: an in-memory store behind the full router.

mod memory;

pub use memory::MemoryStore;

use crate::auth::AuthSettings;
use crate::routes::app;
use crate::state::AppState;
use crate::store::Store;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_SECRET: &[u8] = b"test-secret";

pub fn test_state() -> (Arc<MemoryStore>, AppState) {
    let store = Arc::new(MemoryStore::new());
    let dyn_store: Arc<dyn Store> = store.clone();
    // Minimum bcrypt cost keeps the tests fast.
    let auth = AuthSettings::new(TEST_SECRET, Duration::from_secs(3600), 4);
    (store, AppState::new(dyn_store, auth))
}

pub fn test_server() -> (Arc<MemoryStore>, TestServer) {
    let (store, state) = test_state();
    let server = TestServer::new(app(state, 1024 * 1024)).expect("Could not create test server.");
    (store, server)
}

/// POST and return the `detail` of a 201 envelope.
pub async fn post_created(server: &TestServer, path: &str, body: Value) -> Value {
    let response = server.post(path).json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["detail"].clone()
}

pub async fn create_ledger(server: &TestServer, metadata: Value) -> Value {
    post_created(
        server,
        "/ledgers",
        json!({"name": "Household", "description": "shared costs", "metadata": metadata}),
    )
    .await
}

pub async fn create_account(server: &TestServer, ledger_uuid: &str, name: &str, kind: &str) -> Value {
    post_created(
        server,
        "/accounts",
        json!({"name": name, "type": kind, "ledger_uuid": ledger_uuid, "metadata": {}}),
    )
    .await
}

/// A ledger with a cash (asset) and a rent (expense) account. Returns their uuids.
pub async fn ledger_with_accounts(server: &TestServer) -> (String, String, String) {
    let ledger = create_ledger(server, json!({})).await;
    let ledger_uuid = ledger["uuid"].as_str().expect("ledger uuid").to_string();
    let cash = create_account(server, &ledger_uuid, "Cash", "asset").await;
    let rent = create_account(server, &ledger_uuid, "Rent", "expense").await;
    (
        ledger_uuid,
        cash["uuid"].as_str().expect("account uuid").to_string(),
        rent["uuid"].as_str().expect("account uuid").to_string(),
    )
}

pub fn assert_error(response: &axum_test::TestResponse, status: StatusCode, message: &str) {
    response.assert_status(status);
    assert_eq!(
        response.json::<Value>(),
        json!({"status": status.as_u16(), "message": message})
    );
}
