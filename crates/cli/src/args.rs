//! Command-line arguments.

use std::path::PathBuf;

use buildll_core::{ClientConfig, ConfigError};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "buildll", version, about = "Read and write buildll CMS content")]
pub struct Cli {
    /// Site id (overrides BUILDLL_SITE_ID).
    #[arg(long, global = true)]
    pub site: Option<String>,

    /// API base URL (overrides BUILDLL_BASE_URL).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Public read key (overrides BUILDLL_PUBLIC_API_KEY).
    #[arg(long, global = true)]
    pub public_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one section.
    Get {
        id: String,
        /// Use the server API key and skip the cache.
        #[arg(long)]
        server: bool,
    },
    /// Fetch several sections in one request.
    Batch {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Write a partial update to one section.
    Update {
        id: String,
        /// JSON patch for the section data.
        #[arg(long)]
        data: String,
        #[arg(long, env = "BUILDLL_WRITE_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Write several sections from a JSON file of `[{contentId, data}]`.
    UpdateBatch {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, env = "BUILDLL_WRITE_TOKEN", hide_env_values = true)]
        token: String,
    },
}

impl Cli {
    /// Loaded configuration with command-line overrides applied.
    pub fn config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config: ClientConfig =
            ClientConfig::figment().extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        if let Some(site) = &self.site {
            config.site_id = site.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(key) = &self.public_key {
            config.public_api_key = Some(key.clone());
        }

        config.validate()?;
        Ok(config)
    }
}
