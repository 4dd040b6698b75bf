//! # hiring-fetch
//!
//! Retrieves a discussion thread from the item API and turns its child
//! comments into normalized [`Posting`](hiring_types::Posting)s.
//!
//! ## Components
//! - [`ItemClient`]: fetch-by-id boundary, with [`HttpItemClient`] over reqwest
//! - [`normalize`]: markup to plain text with paragraph breaks kept
//! - [`FetchPipeline`]: root fetch, bounded concurrent child fan-out, filtering
//! - [`discover_latest_hiring_post`]: finds the newest hiring thread id

pub mod client;
pub mod discovery;
pub mod error;
pub mod normalize;
pub mod pipeline;

pub use client::{HttpClientConfig, HttpItemClient, ItemClient};
pub use discovery::discover_latest_hiring_post;
pub use error::FetchError;
pub use normalize::normalize;
pub use pipeline::{FetchPipeline, FetchResult, PipelineConfig};
