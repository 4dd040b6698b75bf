//! Error path E2E tests for the hiring indexer.
//!
//! Root failures are fatal and reported with a typed error; child failures
//! and timeouts are absorbed; store misuse and malformed queries surface
//! as store errors. No test should cause a panic in library code.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::ResponseTemplate;

use e2e_tests::{job_comment, root_item, TestHarness, ROOT_ID};
use hiring_fetch::{FetchError, FetchPipeline, HttpClientConfig, HttpItemClient, PipelineConfig};
use hiring_index::{IndexStore, StoreError, SCHEMA_VERSION};
use hiring_types::Posting;

fn pipeline(harness: &TestHarness) -> FetchPipeline {
    FetchPipeline::new(harness.client(), PipelineConfig::default())
}

#[tokio::test]
async fn test_root_http_error_is_fatal() {
    let harness = TestHarness::new().await;
    harness
        .mount_response(ROOT_ID, ResponseTemplate::new(503))
        .await;

    let err = pipeline(&harness).fetch_postings(ROOT_ID).await.unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 503, .. }));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_unknown_root_is_fatal() {
    let harness = TestHarness::new().await;
    harness.mount_item(ROOT_ID, serde_json::Value::Null).await;

    let err = pipeline(&harness).fetch_postings(ROOT_ID).await.unwrap_err();
    assert!(matches!(err, FetchError::NotFound(id) if id == ROOT_ID));
}

#[tokio::test]
async fn test_root_without_kids_is_fatal() {
    let harness = TestHarness::new().await;
    harness
        .mount_item(ROOT_ID, job_comment(ROOT_ID, "Not a thread", 1))
        .await;

    let err = pipeline(&harness).fetch_postings(ROOT_ID).await.unwrap_err();
    assert!(matches!(err, FetchError::MissingKids(id) if id == ROOT_ID));
}

#[tokio::test]
async fn test_malformed_root_payload_is_fatal() {
    let harness = TestHarness::new().await;
    harness
        .mount_response(
            ROOT_ID,
            ResponseTemplate::new(200).set_body_string("{\"kids\": \"not a list\"}"),
        )
        .await;

    let err = pipeline(&harness).fetch_postings(ROOT_ID).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_api_is_fatal() {
    let client = HttpItemClient::new(
        HttpClientConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2)),
    )
    .unwrap();
    let pipeline = FetchPipeline::new(Arc::new(client), PipelineConfig::default());

    let err = pipeline.fetch_postings(ROOT_ID).await.unwrap_err();
    assert!(matches!(err, FetchError::Request(_)));
}

#[tokio::test]
async fn test_slow_child_is_skipped() {
    let harness = TestHarness::new().await;
    harness
        .mount_item(ROOT_ID, root_item(ROOT_ID, &[1, 2]))
        .await;
    harness
        .mount_item(1, job_comment(1, "Rust developer", 1))
        .await;
    harness
        .mount_slow_item(2, job_comment(2, "Go developer", 1), Duration::from_secs(5))
        .await;

    let config = PipelineConfig::default().with_fetch_timeout(Duration::from_millis(200));
    let pipeline = FetchPipeline::new(harness.client(), config);
    let fetched = pipeline.fetch_postings(ROOT_ID).await.unwrap();

    assert_eq!(fetched.postings.len(), 1);
    assert_eq!(fetched.postings[0].id, "1");
    assert_eq!(fetched.skipped, 1);
}

#[test]
fn test_store_use_before_initialize() {
    let mut store = IndexStore::open_in_memory().unwrap();
    let posting = Posting::new("1", "Rust", "alice", 1_700_000_000);

    assert!(matches!(
        store.upsert(&[posting]),
        Err(StoreError::NotInitialized)
    ));
    assert!(matches!(
        store.search("rust", 30, 10, true),
        Err(StoreError::NotInitialized)
    ));
}

#[test]
fn test_malformed_query_surfaces_engine_message() {
    let mut store = IndexStore::open_in_memory().unwrap();
    store.initialize().unwrap();

    let err = store.search("rust AND", 30, 10, true).unwrap_err();
    match &err {
        StoreError::Sqlite(inner) => {
            assert_eq!(err.to_string(), inner.to_string());
            assert!(err.to_string().contains("syntax error"));
        }
        other => panic!("expected engine error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_newer_schema_on_disk_is_refused() {
    let harness = TestHarness::new().await;

    let mut store = harness.open_store();
    store.initialize().unwrap();
    store
        .upsert(&[Posting::new("1", "Rust", "alice", 1_700_000_000)])
        .unwrap();
    store.close().unwrap();

    // Stamp the file as written by a future version.
    let conn = rusqlite::Connection::open(&harness.index_path).unwrap();
    conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
        .unwrap();
    drop(conn);

    let mut store = harness.open_store();
    let err = store.initialize().unwrap_err();
    assert!(matches!(
        err,
        StoreError::SchemaVersion { found, expected }
            if found == SCHEMA_VERSION + 1 && expected == SCHEMA_VERSION
    ));
    assert!(store.table_exists().unwrap());
    assert!(matches!(store.count(), Err(StoreError::NotInitialized)));
}
