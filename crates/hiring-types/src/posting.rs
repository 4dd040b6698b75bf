//! Posting: the normalized, stored and searchable unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author handle used when the source item has none.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Public URL prefix for a single item.
pub const ITEM_URL: &str = "https://news.ycombinator.com/item";

const SECONDS_PER_DAY: i64 = 86_400;

/// A normalized record derived from one qualifying child item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Source item id, primary key within one index
    pub id: String,

    /// Plain-text body produced by the normalizer
    pub text: String,

    /// Author handle, or [`UNKNOWN_AUTHOR`]
    pub by: String,

    /// Author-supplied creation time (unix seconds)
    pub timestamp: i64,

    /// When the record was first written locally
    pub created_at: DateTime<Utc>,
}

impl Posting {
    /// Create a posting stamped with the current time as `created_at`.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        by: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            by: by.into(),
            timestamp,
            created_at: Utc::now(),
        }
    }

    /// Override `created_at` (used when loading from storage).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Whole days elapsed since the posting was made. Never negative.
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        ((now.timestamp() - self.timestamp) / SECONDS_PER_DAY).max(0)
    }

    /// Human-readable age, e.g. "today", "3 days ago", "2 weeks ago".
    pub fn age_text(&self, now: DateTime<Utc>) -> String {
        match self.age_days(now) {
            0 => "today".to_string(),
            1 => "1 day ago".to_string(),
            days if days < 7 => format!("{} days ago", days),
            days if days < 30 => {
                let weeks = days / 7;
                format!("{} week{} ago", weeks, if weeks == 1 { "" } else { "s" })
            }
            days => format!("{} days ago", days),
        }
    }

    /// Posted within the last week.
    pub fn is_recent(&self, now: DateTime<Utc>) -> bool {
        self.age_days(now) <= 7
    }

    /// Link to the posting on the source site.
    pub fn item_url(&self) -> String {
        format!("{}?id={}", ITEM_URL, self.id)
    }
}
