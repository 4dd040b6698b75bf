//! Discovery of the most recent "Who is hiring?" thread.
//!
//! Uses the date-sorted search API, restricted to stories posted by the
//! account that opens the monthly threads.

use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::info;

use crate::error::FetchError;

const HIRING_QUERY: &str = "Ask HN: Who is hiring?";
const HIRING_TAGS: &str = "story,author_whoishiring";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "objectID")]
    object_id: String,
}

/// Return the item id of the newest hiring thread.
pub async fn discover_latest_hiring_post(
    client: &Client,
    search_api_url: &str,
) -> Result<u64, FetchError> {
    let endpoint = format!("{}/search_by_date", search_api_url.trim_end_matches('/'));
    let url = Url::parse_with_params(
        &endpoint,
        &[
            ("query", HIRING_QUERY),
            ("tags", HIRING_TAGS),
            ("hitsPerPage", "1"),
        ],
    )
    .map_err(|e| FetchError::Decode(format!("invalid search url {}: {}", endpoint, e)))?;

    let response = client.get(url.clone()).send().await?;
    if !response.status().is_success() {
        return Err(FetchError::Http {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    let body: SearchResponse = serde_json::from_str(&response.text().await?)?;
    let hit = body.hits.first().ok_or(FetchError::NoHiringPost)?;

    let id = hit
        .object_id
        .parse::<u64>()
        .map_err(|e| FetchError::Decode(format!("objectID {:?}: {}", hit.object_id, e)))?;

    info!(id, "Discovered latest hiring post");
    Ok(id)
}
