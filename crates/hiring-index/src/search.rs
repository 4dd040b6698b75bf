//! Keyword search over stored postings.
//!
//! A search is the join of the full-text match set with a hard
//! `timestamp >= now - days` cutoff, ordered newest first or by the
//! engine's relevance rank.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tracing::{debug, info};

use hiring_types::Posting;

use crate::error::StoreError;
use crate::query::to_fts_query;
use crate::store::IndexStore;

const SECONDS_PER_DAY: i64 = 86_400;

const SEARCH_BY_TIME: &str = r#"
SELECT p.id, p.text, p."by", p.timestamp, p.created_at
FROM postings p
JOIN (SELECT rowid, rank FROM postings_fts WHERE postings_fts MATCH ?1) m
    ON p.rowid = m.rowid
WHERE p.timestamp >= ?2
ORDER BY p.timestamp DESC
LIMIT ?3
"#;

const SEARCH_BY_RANK: &str = r#"
SELECT p.id, p.text, p."by", p.timestamp, p.created_at
FROM postings p
JOIN (SELECT rowid, rank FROM postings_fts WHERE postings_fts MATCH ?1) m
    ON p.rowid = m.rowid
WHERE p.timestamp >= ?2
ORDER BY m.rank
LIMIT ?3
"#;

/// Search options for filtering and limiting results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Only postings made within this many days
    pub days: u32,
    /// Maximum results to return
    pub limit: usize,
    /// Newest first when true, relevance order otherwise
    pub sort_by_time: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            days: 30,
            limit: 100,
            sort_by_time: true,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_sort_by_time(mut self, sort_by_time: bool) -> Self {
        self.sort_by_time = sort_by_time;
        self
    }
}

fn row_to_posting(row: &Row<'_>) -> rusqlite::Result<Posting> {
    let created_secs: i64 = row.get(4)?;
    let created_at = DateTime::<Utc>::from_timestamp(created_secs, 0)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(4, created_secs))?;

    Ok(Posting {
        id: row.get(0)?,
        text: row.get(1)?,
        by: row.get(2)?,
        timestamp: row.get(3)?,
        created_at,
    })
}

impl IndexStore {
    /// Search postings made within the last `days` days.
    pub fn search(
        &self,
        query: &str,
        days: u32,
        limit: usize,
        sort_by_time: bool,
    ) -> Result<Vec<Posting>, StoreError> {
        let options = SearchOptions {
            days,
            limit,
            sort_by_time,
        };
        self.search_with(query, &options)
    }

    /// Search with explicit options.
    ///
    /// A blank query or a zero limit returns no results. A `NOT` with no
    /// left operand fails with [`StoreError::InvalidQuery`]; other syntax
    /// errors surface as [`StoreError::Sqlite`] with SQLite's message.
    pub fn search_with(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Posting>, StoreError> {
        self.ensure_current()?;

        if query.trim().is_empty() || options.limit == 0 {
            return Ok(Vec::new());
        }

        let fts_query = to_fts_query(query)?;
        let cutoff = Utc::now().timestamp() - i64::from(options.days) * SECONDS_PER_DAY;
        let limit = i64::try_from(options.limit).unwrap_or(i64::MAX);

        debug!(query, fts_query = %fts_query, cutoff, limit, "Executing search");

        let sql = if options.sort_by_time {
            SEARCH_BY_TIME
        } else {
            SEARCH_BY_RANK
        };
        let mut stmt = self.conn.prepare_cached(sql)?;
        let postings = stmt
            .query_map(params![fts_query, cutoff, limit], row_to_posting)?
            .collect::<Result<Vec<_>, _>>()?;

        info!(query, results = postings.len(), "Search complete");
        Ok(postings)
    }
}
