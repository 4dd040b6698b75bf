//! Raw items as returned by the tree-structured item API.
//!
//! Every field is optional at this boundary. Defaults (such as the
//! author sentinel) are applied only when an item becomes a [`Posting`].

use serde::{Deserialize, Serialize};

use crate::posting::{Posting, UNKNOWN_AUTHOR};

/// An API-shaped item: a root story or one of its child comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Source-assigned id
    #[serde(default)]
    pub id: Option<u64>,

    /// Child ids, in API order (root items only)
    #[serde(default)]
    pub kids: Option<Vec<u64>>,

    /// Marked-up body
    #[serde(default)]
    pub text: Option<String>,

    /// Creation time in unix seconds
    #[serde(default)]
    pub time: Option<i64>,

    /// Author handle
    #[serde(default)]
    pub by: Option<String>,
}

impl Item {
    /// Convert into a [`Posting`], normalizing the body with `normalize`.
    ///
    /// Returns `None` when `text` or `time` is absent, or when the
    /// normalized body is empty. `requested_id` is used when the payload
    /// does not echo its own id.
    pub fn into_posting<F>(self, requested_id: u64, normalize: F) -> Option<Posting>
    where
        F: FnOnce(&str) -> String,
    {
        let (Some(markup), Some(time)) = (self.text, self.time) else {
            return None;
        };

        let text = normalize(&markup);
        if text.is_empty() {
            return None;
        }

        let id = self.id.unwrap_or(requested_id);
        let by = self.by.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        Some(Posting::new(id.to_string(), text, by, time))
    }
}
