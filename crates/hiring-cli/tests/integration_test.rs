//! Integration tests for the run orchestration.
//!
//! These tests drive `sync_and_search` against a mocked item API and an
//! on-disk index, covering first run, reuse of an existing index and
//! reindexing.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hiring_cli::sync_and_search;
use hiring_fetch::{HttpClientConfig, HttpItemClient, ItemClient};
use hiring_index::IndexStore;
use hiring_types::Settings;

const ROOT_ID: u64 = 100;

/// Serve a root item with the given children.
async fn mock_thread(children: &[(u64, Value)]) -> MockServer {
    let server = MockServer::start().await;
    let kids: Vec<u64> = children.iter().map(|(id, _)| *id).collect();

    Mock::given(method("GET"))
        .and(path(format!("/item/{}.json", ROOT_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": ROOT_ID,
            "kids": kids,
            "by": "whoishiring",
            "time": Utc::now().timestamp() - 5 * 86_400,
        })))
        .mount(&server)
        .await;

    for (id, body) in children {
        Mock::given(method("GET"))
            .and(path(format!("/item/{}.json", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;
    }

    server
}

fn comment(id: u64, text: &str) -> (u64, Value) {
    (
        id,
        json!({
            "id": id,
            "text": text,
            "by": format!("user{}", id),
            "time": Utc::now().timestamp() - 86_400,
        }),
    )
}

fn client(base_url: &str) -> Arc<dyn ItemClient> {
    Arc::new(HttpItemClient::new(HttpClientConfig::new(base_url)).unwrap())
}

fn settings(query: &str) -> Settings {
    Settings {
        query: query.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_first_run_fetches_and_indexes() {
    let server = mock_thread(&[
        comment(1, "Acme | Python developer | <i>Remote</i>"),
        comment(2, "Front-end developer<p>Onsite"),
        (3, Value::Null),
        (4, json!({"id": 4, "deleted": true})),
    ])
    .await;

    let dir = TempDir::new().unwrap();
    let mut store = IndexStore::open(&dir.path().join("index.db")).unwrap();

    let results = sync_and_search(
        &mut store,
        client(&server.uri()),
        &settings("python AND remote"),
        ROOT_ID,
        false,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "1");
    assert_eq!(results[0].by, "user1");
    assert!(!results[0].text.contains("<i>"));
    assert_eq!(store.count().unwrap(), 2);
    store.close().unwrap();
}

#[tokio::test]
async fn test_existing_index_is_reused() {
    let server = mock_thread(&[comment(1, "Rust developer, remote")]).await;
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("index.db");

    let mut store = IndexStore::open(&db_path).unwrap();
    sync_and_search(&mut store, client(&server.uri()), &settings("rust"), ROOT_ID, false)
        .await
        .unwrap();
    store.close().unwrap();

    // Nothing listens here; a fetch attempt would fail the run.
    let mut store = IndexStore::open(&db_path).unwrap();
    let results = sync_and_search(
        &mut store,
        client("http://127.0.0.1:9"),
        &settings("rust"),
        ROOT_ID,
        false,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "1");
}

#[tokio::test]
async fn test_reindex_replaces_contents() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("index.db");

    let first = mock_thread(&[comment(1, "Python developer")]).await;
    let mut store = IndexStore::open(&db_path).unwrap();
    sync_and_search(&mut store, client(&first.uri()), &settings("python"), ROOT_ID, false)
        .await
        .unwrap();

    let second = mock_thread(&[comment(2, "JavaScript developer")]).await;
    let results = sync_and_search(
        &mut store,
        client(&second.uri()),
        &settings("javascript"),
        ROOT_ID,
        true,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "2");
    assert_eq!(store.count().unwrap(), 1);
}

#[tokio::test]
async fn test_root_failure_aborts_without_creating_index() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/item/{}.json", ROOT_ID)))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut store = IndexStore::open_in_memory().unwrap();
    let err = sync_and_search(
        &mut store,
        client(&server.uri()),
        &settings("python"),
        ROOT_ID,
        false,
    )
    .await
    .unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to fetch hiring thread 100"));
    assert!(!store.table_exists().unwrap());
}
