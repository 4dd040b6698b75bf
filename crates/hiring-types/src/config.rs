//! Configuration loading for the hiring indexer.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at `~/.config/hiring/config.toml`
//! (platform equivalent via `directories`).

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::HiringError;

const APP_NAME: &str = "hiring";

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the item API (`<base>/item/<id>.json`)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the date-sorted search API used to discover the root item
    #[serde(default = "default_search_api_url")]
    pub search_api_url: String,

    /// Directory holding one index file per root item
    #[serde(default = "default_index_dir")]
    pub index_dir: String,

    /// File name prefix for index files (`<prefix>_<root_id>.db`)
    #[serde(default = "default_index_prefix")]
    pub index_prefix: String,

    /// Upper bound on in-flight child fetches
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Default search window in days
    #[serde(default = "default_days")]
    pub days: u32,

    /// Default maximum number of search results
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Default query text
    #[serde(default = "default_query")]
    pub query: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    "https://hacker-news.firebaseio.com/v0".to_string()
}

fn default_search_api_url() -> String {
    "https://hn.algolia.com/api/v1".to_string()
}

fn default_index_dir() -> String {
    ProjectDirs::from("", "", APP_NAME)
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .to_string_lossy()
        .to_string()
}

fn default_index_prefix() -> String {
    "hackernews_job_postings".to_string()
}

fn default_max_concurrent_fetches() -> usize {
    32
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_days() -> u32 {
    30
}

fn default_limit() -> usize {
    100
}

fn default_query() -> String {
    "python AND remote".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            search_api_url: default_search_api_url(),
            index_dir: default_index_dir(),
            index_prefix: default_index_prefix(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            days: default_days(),
            limit: default_limit(),
            query: default_query(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/hiring/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (HIRING_*, nested keys use `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, HiringError> {
        let config_dir = ProjectDirs::from("", "", APP_NAME)
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("api_base_url", default_api_base_url())?
            .set_default("search_api_url", default_search_api_url())?
            .set_default("index_dir", default_index_dir())?
            .set_default("index_prefix", default_index_prefix())?
            .set_default(
                "max_concurrent_fetches",
                default_max_concurrent_fetches() as i64,
            )?
            .set_default("fetch_timeout_secs", default_fetch_timeout_secs() as i64)?
            .set_default("days", default_days() as i64)?
            .set_default("limit", default_limit() as i64)?
            .set_default("query", default_query())?
            .set_default("log_level", default_log_level())?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // HIRING_INDEX_DIR, HIRING_MAX_CONCURRENT_FETCHES, ...
        builder = builder.add_source(
            Environment::with_prefix("HIRING")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), HiringError> {
        if self.max_concurrent_fetches == 0 {
            return Err(HiringError::Config(
                "max_concurrent_fetches must be > 0".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(HiringError::Config(
                "fetch_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.limit == 0 {
            return Err(HiringError::Config("limit must be > 0".to_string()));
        }
        Ok(())
    }

    /// Expand `~` in index_dir to the home directory
    pub fn expanded_index_dir(&self) -> PathBuf {
        if let Some(rest) = self.index_dir.strip_prefix("~/") {
            if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
            {
                return home.join(rest);
            }
        }
        PathBuf::from(&self.index_dir)
    }

    /// Deterministic index file for one root item.
    pub fn index_path(&self, root_id: u64) -> PathBuf {
        self.expanded_index_dir()
            .join(format!("{}_{}.db", self.index_prefix, root_id))
    }
}
