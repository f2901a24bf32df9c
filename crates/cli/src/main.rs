//! buildll command-line entry point.
//!
//! Reads and writes CMS content through the cached client. Results go to
//! stdout as JSON; logs go to stderr so output stays pipeable.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = args::Cli::parse();
    let config = cli.config()?;
    tracing::info!(site_id = %config.site_id, base_url = %config.resolved_base_url(), "starting buildll");

    let output = commands::run(&cli.command, config).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
