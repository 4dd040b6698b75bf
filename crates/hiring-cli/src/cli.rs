//! CLI argument parsing for the hiring search tool.
//!
//! Flags override the layered configuration (defaults, config file,
//! `HIRING_*` environment).

use clap::Parser;

use hiring_types::Settings;

/// Search "Who is hiring?" postings from Hacker News.
///
/// Fetches the thread once into a local full-text index, then runs a
/// keyword query against it.
#[derive(Parser, Debug)]
#[command(name = "hiring")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Drop the index for this thread and fetch it again
    #[arg(short, long)]
    pub reindex: bool,

    /// Item id of the hiring thread (default: the latest one)
    #[arg(short, long)]
    pub job_posting_id: Option<u64>,

    /// Query, e.g. "python AND remote" or "rust NOT onsite"
    #[arg(short, long)]
    pub query_text: Option<String>,

    /// Maximum number of postings to show
    #[arg(short = 'c', long)]
    pub search_count: Option<usize>,

    /// Only show postings from the last N days
    #[arg(short, long)]
    pub days: Option<u32>,

    /// Path to config file (overrides default ~/.config/hiring/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Apply flag values on top of loaded settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(query) = &self.query_text {
            settings.query = query.clone();
        }
        if let Some(count) = self.search_count {
            settings.limit = count;
        }
        if let Some(days) = self.days {
            settings.days = days;
        }
        if let Some(level) = &self.log_level {
            settings.log_level = level.clone();
        }
    }
}
