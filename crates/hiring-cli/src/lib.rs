//! Hiring search CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Run orchestration (resolve, index, search)
//! - `output`: Plain-text rendering of results

pub mod cli;
pub mod commands;
pub mod output;

pub use cli::Cli;
pub use commands::{pipeline_config, run, search_options, sync_and_search};
pub use output::{print_search_query_info, print_search_results};
