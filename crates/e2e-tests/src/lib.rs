//! End-to-end test infrastructure for the hiring indexer.
//!
//! Provides a shared TestHarness (mock item API plus a temp index file)
//! and helpers for building hiring threads.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hiring_fetch::{HttpClientConfig, HttpItemClient, ItemClient};
use hiring_index::IndexStore;

/// Root id used by the default thread helpers.
pub const ROOT_ID: u64 = 38_842_977;

const SECONDS_PER_DAY: i64 = 86_400;

/// Shared test harness for E2E tests.
///
/// Owns a mock item API server and a temp directory holding the index file.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Mock item and search API
    pub server: MockServer,
    /// Index file for this harness
    pub index_path: PathBuf,
}

impl TestHarness {
    /// Start the mock server and reserve an index path.
    pub async fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let index_path = temp_dir.path().join(format!("postings_{}.db", ROOT_ID));
        let server = MockServer::start().await;

        Self {
            _temp_dir: temp_dir,
            server,
            index_path,
        }
    }

    /// HTTP item client pointed at the mock server.
    pub fn client(&self) -> Arc<dyn ItemClient> {
        Arc::new(self.http_client())
    }

    pub fn http_client(&self) -> HttpItemClient {
        HttpItemClient::new(HttpClientConfig::new(self.server.uri()))
            .expect("Failed to build HTTP client")
    }

    /// Open (creating if needed) the harness index file.
    pub fn open_store(&self) -> IndexStore {
        IndexStore::open(&self.index_path).expect("Failed to open index")
    }

    /// Serve `body` for `GET /item/<id>.json`.
    pub async fn mount_item(&self, id: u64, body: Value) {
        self.mount_response(id, ResponseTemplate::new(200).set_body_json(body))
            .await;
    }

    /// Serve an arbitrary response for `GET /item/<id>.json`.
    pub async fn mount_response(&self, id: u64, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/item/{}.json", id)))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Serve a root item whose kids are `children`, and each child.
    pub async fn mount_thread(&self, root_id: u64, children: &[(u64, Value)]) {
        let kids: Vec<u64> = children.iter().map(|(id, _)| *id).collect();
        self.mount_item(root_id, root_item(root_id, &kids)).await;
        for (id, body) in children {
            self.mount_item(*id, body.clone()).await;
        }
    }

    /// Serve a child that answers only after `delay`.
    pub async fn mount_slow_item(&self, id: u64, body: Value, delay: Duration) {
        self.mount_response(
            id,
            ResponseTemplate::new(200).set_body_json(body).set_delay(delay),
        )
        .await;
    }

    /// Serve the date-sorted search endpoint returning one hit.
    pub async fn mount_latest_thread(&self, root_id: u64) {
        Mock::given(method("GET"))
            .and(path("/search_by_date"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": [{
                    "objectID": root_id.to_string(),
                    "title": "Ask HN: Who is hiring?",
                }]
            })))
            .mount(&self.server)
            .await;
    }
}

/// A story item with the given kids.
pub fn root_item(id: u64, kids: &[u64]) -> Value {
    json!({
        "id": id,
        "by": "whoishiring",
        "kids": kids,
        "time": Utc::now().timestamp() - 10 * SECONDS_PER_DAY,
        "title": "Ask HN: Who is hiring?",
        "type": "story",
    })
}

/// A comment posted `age_days` ago (plus one hour, so it sits inside a
/// `days = age_days` window).
pub fn job_comment(id: u64, text: &str, age_days: i64) -> Value {
    json!({
        "id": id,
        "by": format!("employer{}", id),
        "parent": ROOT_ID,
        "text": text,
        "time": Utc::now().timestamp() - age_days * SECONDS_PER_DAY + 3600,
        "type": "comment",
    })
}

/// The five reference postings used to check boolean query semantics.
pub fn sample_thread() -> Vec<(u64, Value)> {
    vec![
        (1, job_comment(1, "Python developer - <b>Remote</b>", 1)),
        (2, job_comment(2, "Remote work available - Python", 1)),
        (3, job_comment(3, "Front-end developer", 1)),
        (4, job_comment(4, "Python developer", 1)),
        (5, job_comment(5, "Boston Onsite - Python", 1)),
    ]
}

/// Sorted ids of a result set.
pub fn sorted_ids(postings: &[hiring_types::Posting]) -> Vec<String> {
    let mut ids: Vec<String> = postings.iter().map(|p| p.id.clone()).collect();
    ids.sort();
    ids
}
