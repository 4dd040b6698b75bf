//! Item API client.
//!
//! The pipeline only sees the [`ItemClient`] trait. [`HttpItemClient`]
//! owns the single HTTP session for a run and is shared by reference
//! count across the fan-out tasks; dropping the last handle releases it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use hiring_types::Item;

use crate::error::FetchError;

/// Fetch-by-id access to the tree API.
#[async_trait]
pub trait ItemClient: Send + Sync {
    /// Fetch one item. A missing item is [`FetchError::NotFound`].
    async fn fetch_item(&self, id: u64) -> Result<Item, FetchError>;
}

/// Configuration for [`HttpItemClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// API base URL (e.g., "https://hacker-news.firebaseio.com/v0")
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hacker-news.firebaseio.com/v0".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// reqwest-backed item client.
pub struct HttpItemClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpItemClient {
    /// Build the client and its connection pool.
    pub fn new(config: HttpClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// The underlying HTTP session, for collaborators such as discovery.
    pub fn http(&self) -> &Client {
        &self.client
    }

    fn item_url(&self, id: u64) -> String {
        format!("{}/item/{}.json", self.config.base_url.trim_end_matches('/'), id)
    }
}

#[async_trait]
impl ItemClient for HttpItemClient {
    async fn fetch_item(&self, id: u64) -> Result<Item, FetchError> {
        let url = self.item_url(id);
        debug!(id, url = %url, "Fetching item");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Http {
                status: response.status().as_u16(),
                url,
            });
        }

        let body = response.text().await?;

        // The API answers `null` for ids it does not know.
        let item: Option<Item> = serde_json::from_str(&body)?;
        item.ok_or(FetchError::NotFound(id))
    }
}
