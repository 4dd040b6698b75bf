//! Run orchestration for the `hiring` binary.
//!
//! 1. Load configuration (defaults -> file -> env -> CLI flags)
//! 2. Resolve the thread id (flag or discovery)
//! 3. Open the per-thread index; fetch and index it if missing
//! 4. Search, close the index, print results

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use hiring_fetch::{
    discover_latest_hiring_post, FetchPipeline, HttpClientConfig, HttpItemClient, ItemClient,
    PipelineConfig,
};
use hiring_index::{IndexStore, SearchOptions};
use hiring_types::{Posting, Settings};

use crate::cli::Cli;
use crate::output::{print_search_query_info, print_search_results};

/// Initialize logging to stderr. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Pipeline bounds from settings.
pub fn pipeline_config(settings: &Settings) -> PipelineConfig {
    PipelineConfig::default()
        .with_max_concurrency(settings.max_concurrent_fetches)
        .with_fetch_timeout(Duration::from_secs(settings.fetch_timeout_secs))
}

/// Search options from settings. The CLI always orders newest first.
pub fn search_options(settings: &Settings) -> SearchOptions {
    SearchOptions::new()
        .with_days(settings.days)
        .with_limit(settings.limit)
        .with_sort_by_time(true)
}

/// Bring the store up to date for `root_id` and run the configured search.
///
/// With `reindex` the existing tables are dropped first. A missing table
/// triggers a full fetch; an existing one is only initialized (which
/// migrates older layouts).
pub async fn sync_and_search(
    store: &mut IndexStore,
    client: Arc<dyn ItemClient>,
    settings: &Settings,
    root_id: u64,
    reindex: bool,
) -> Result<Vec<Posting>> {
    if reindex {
        println!("Reindexing job postings...");
        store.drop_table().context("Failed to drop index")?;
    }

    if !store.table_exists().context("Failed to inspect index")? {
        println!("Indexing job postings...");
        let pipeline = FetchPipeline::new(client, pipeline_config(settings));
        let fetched = pipeline
            .fetch_postings(root_id)
            .await
            .with_context(|| format!("Failed to fetch hiring thread {}", root_id))?;

        store.initialize().context("Failed to initialize index")?;
        let indexed = store
            .upsert(&fetched.postings)
            .context("Failed to store postings")?;
        println!(
            "Successfully indexed {} job postings ({} skipped)",
            indexed, fetched.skipped
        );
    } else {
        store.initialize().context("Failed to initialize index")?;
    }

    let postings = store
        .search_with(&settings.query, &search_options(settings))
        .with_context(|| format!("Search failed for query {:?}", settings.query))?;
    Ok(postings)
}

/// Entry point for one invocation.
pub async fn run(cli: Cli) -> Result<()> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut settings);
    settings.validate().context("Invalid configuration")?;

    init_tracing(&settings.log_level)?;

    info!("Configuration:");
    info!("  API: {}", settings.api_base_url);
    info!("  Index dir: {}", settings.index_dir);
    info!("  Log level: {}", settings.log_level);

    let client = HttpItemClient::new(
        HttpClientConfig::new(settings.api_base_url.as_str())
            .with_timeout(Duration::from_secs(settings.fetch_timeout_secs)),
    )
    .context("Failed to build HTTP client")?;

    let root_id = match cli.job_posting_id {
        Some(id) => {
            println!("Using job posting: {}", id);
            id
        }
        None => {
            let id = discover_latest_hiring_post(client.http(), &settings.search_api_url)
                .await
                .context("Failed to find the latest hiring thread")?;
            println!("Using latest job posting: {}", id);
            id
        }
    };

    let path = settings.index_path(root_id);
    let mut store = IndexStore::open(&path)
        .with_context(|| format!("Failed to open index at {}", path.display()))?;

    let searched = sync_and_search(&mut store, Arc::new(client), &settings, root_id, cli.reindex)
        .await;
    let closed = store.close().context("Failed to close index");
    let postings = searched?;
    closed?;

    print_search_query_info(&settings.query, postings.len());
    print_search_results(&postings, true);

    Ok(())
}
