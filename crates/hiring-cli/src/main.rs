//! Hacker News hiring thread search
//!
//! # Usage
//!
//! ```bash
//! hiring [-r] [-j ID] [-q QUERY] [-c COUNT] [-d DAYS] [--config PATH] [-l LEVEL]
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/hiring/config.toml)
//! 3. Environment variables (HIRING_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use hiring_cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
