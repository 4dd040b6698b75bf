//! Fetch error types.

use thiserror::Error;

/// Errors that can occur while talking to the item or search APIs.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, TLS, body read, client timeout)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// Payload could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The API answered `null` for this id
    #[error("Item not found: {0}")]
    NotFound(u64),

    /// Root item has no `kids` field
    #[error("Item {0} has no children")]
    MissingKids(u64),

    /// Discovery search returned no hits
    #[error("No 'Who is hiring' posts found")]
    NoHiringPost,

    /// Per-fetch deadline elapsed
    #[error("Timed out fetching item {0}")]
    Timeout(u64),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Http {
            status: 503,
            url: "http://localhost/item/1.json".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 from http://localhost/item/1.json");

        assert_eq!(FetchError::MissingKids(9).to_string(), "Item 9 has no children");
        assert_eq!(FetchError::Timeout(4).to_string(), "Timed out fetching item 4");
    }

    #[test]
    fn test_from_serde_error() {
        let json_err = serde_json::from_str::<u64>("\"seven\"").unwrap_err();
        let err: FetchError = json_err.into();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
