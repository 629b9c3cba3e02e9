//! End-to-end checks of the record API against a real SQLite database.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::time::SystemTime;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::rest::{
    self,
    token::{ActionToken, RECORDS_ACTION},
    AppState,
};
use crate::storage::{SqliteStorage, Storage};

struct TestApi {
    router: Router,
    storage: SqliteStorage,
    nonce: String,
    // Holds the database directory alive for the test's duration.
    _data_dir: TempDir,
}

fn test_api() -> TestApi {
    let data_dir = TempDir::new().expect("temp dir");
    let storage = SqliteStorage::new(data_dir.path().join("rolodex.sqlite"));
    storage.init().expect("storage init");

    let token = ActionToken::new(b"integration-secret", RECORDS_ACTION);
    let nonce = token.issue();
    let router = rest::router(AppState {
        storage: storage.clone(),
        token,
        started_at: SystemTime::now(),
    });

    TestApi {
        router,
        storage,
        nonce,
        _data_dir: data_dir,
    }
}

async fn get(api: &TestApi, uri: &str) -> (StatusCode, Value) {
    let response = api
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_form(api: &TestApi, uri: &str, body: String) -> (StatusCode, Value) {
    let response = api
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .method("POST")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn full_record_lifecycle() {
    let api = test_api();
    let nonce = api.nonce.clone();

    // Fresh table: list is the documented error envelope, not an empty success.
    let (status, payload) = get(&api, &format!("/records/list?nonce={nonce}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload, json!({"success": false}));

    // Create.
    let (status, payload) = post_form(
        &api,
        "/records/add",
        format!("name=Ada+Lovelace&email=ada@example.com&nonce={nonce}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["data"]["id"], json!(1));

    // Read it back.
    let (status, payload) = get(&api, &format!("/records/get?id=1&nonce={nonce}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["name"], json!("Ada Lovelace"));
    assert_eq!(payload["data"]["email"], json!("ada@example.com"));
    assert_eq!(payload["data"]["createdAt"], payload["data"]["updatedAt"]);

    // List now succeeds with the one record.
    let (status, payload) = get(&api, &format!("/records/list?nonce={nonce}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"].as_array().unwrap().len(), 1);

    // Update and verify the returned record reflects the new values.
    let (status, payload) = post_form(
        &api,
        "/records/update",
        format!("id=1&name=Ada+L.&email=ada.l@example.com&nonce={nonce}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["name"], json!("Ada L."));
    assert_eq!(payload["data"]["email"], json!("ada.l@example.com"));
    assert_ne!(payload["data"]["createdAt"], payload["data"]["updatedAt"]);

    // Delete, then reading reports not-found.
    let (status, payload) = post_form(
        &api,
        "/records/delete",
        format!("id=1&nonce={nonce}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["deleted"], json!(true));

    let (status, payload) = get(&api, &format!("/records/get?id=1&nonce={nonce}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload, json!({"success": false}));
}

#[tokio::test]
async fn forged_nonce_never_touches_the_store() {
    let api = test_api();

    let (status, payload) = post_form(
        &api,
        "/records/add",
        "name=Mallory&email=mallory@example.com&nonce=deadbeef".to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(payload, json!({"success": false}));

    // Row count is unchanged.
    assert!(api.storage.list_records().unwrap().is_empty());

    // Same for update and delete against an existing row.
    let id = api
        .storage
        .insert_record("Ada Lovelace", "ada@example.com")
        .unwrap();

    let (status, _) = post_form(
        &api,
        "/records/update",
        format!("id={id}&name=Mallory&email=mallory@example.com&nonce=deadbeef"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post_form(&api, "/records/delete", format!("id={id}&nonce=deadbeef")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let record = api.storage.load_record(id).unwrap().unwrap();
    assert_eq!(record.name, "Ada Lovelace");
    assert_eq!(api.storage.list_records().unwrap().len(), 1);
}

#[tokio::test]
async fn update_keeps_created_at_and_bumps_updated_at() {
    let api = test_api();
    let nonce = api.nonce.clone();

    let id = api
        .storage
        .insert_record("Ada Lovelace", "ada@example.com")
        .unwrap();
    let before = api.storage.load_record(id).unwrap().unwrap();

    let (status, _) = post_form(
        &api,
        "/records/update",
        format!("id={id}&name=Ada+L.&email=ada.l@example.com&nonce={nonce}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let after = api.storage.load_record(id).unwrap().unwrap();
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn health_needs_no_nonce() {
    let api = test_api();
    let (status, payload) = get(&api, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["status"], json!("ok"));
}
