//! # hiring-types
//!
//! Shared domain types for the hiring thread indexer.
//!
//! This crate defines the data structures passed between the fetch
//! pipeline, the index store and the command-line front end:
//! - Items: raw, API-shaped entries from the discussion tree
//! - Postings: normalized, searchable records derived from child items
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use hiring_types::Posting;
//!
//! let posting = Posting::new("42", "Rust engineer, remote", "pg", 1_700_000_000);
//! assert_eq!(posting.id, "42");
//! ```

pub mod config;
pub mod error;
pub mod item;
pub mod posting;

pub use config::Settings;
pub use error::HiringError;
pub use item::Item;
pub use posting::{Posting, UNKNOWN_AUTHOR};
