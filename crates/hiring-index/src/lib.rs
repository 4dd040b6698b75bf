//! # hiring-index
//!
//! Persistent full-text index of postings for one root item, backed by
//! SQLite with an FTS5 external-content table.
//!
//! ## Features
//! - One file per root item, one `postings` table keyed by item id
//! - FTS5 index over `text`, `by` and `id`, kept in sync by triggers
//! - Upsert in a single transaction
//! - Boolean keyword queries (`AND`, `NOT`, implicit `OR`) combined with a
//!   hard time-window cutoff
//! - Versioned schema with in-place migration of older layouts

pub mod error;
pub mod query;
pub mod schema;
pub mod search;
pub mod store;

pub use error::StoreError;
pub use query::to_fts_query;
pub use schema::{SchemaState, SCHEMA_VERSION};
pub use search::SearchOptions;
pub use store::IndexStore;
