//! Client configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (BUILDLL_*)
//! 2. TOML config file (if BUILDLL_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The API base URL is resolved once from the explicit [`Deployment`] and
//! optional `base_url` override. Nothing is inferred from the runtime
//! environment.

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Default API host for hosted deployments.
pub const HOSTED_BASE_URL: &str = "https://api.buildll.com";

/// Default API host when the site runs next to a local dashboard.
pub const LOCAL_BASE_URL: &str = "http://localhost:3000/api";

/// Deployment context that selects the default API base URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    /// Public hosted API.
    #[default]
    Hosted,
    /// Local development API served alongside the dashboard.
    Local,
}

impl Deployment {
    /// Default base URL for this deployment.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Deployment::Hosted => HOSTED_BASE_URL,
            Deployment::Local => LOCAL_BASE_URL,
        }
    }
}

/// Client configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (BUILDLL_*)
/// 2. TOML config file (if BUILDLL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Site (tenant) every cache key and request is scoped to.
    ///
    /// Set via BUILDLL_SITE_ID environment variable. Required.
    #[serde(default)]
    pub site_id: String,

    /// Deployment context used to pick the default base URL.
    ///
    /// Set via BUILDLL_DEPLOYMENT environment variable (`hosted` or `local`).
    #[serde(default)]
    pub deployment: Deployment,

    /// Explicit API base URL, overriding the deployment default.
    ///
    /// Set via BUILDLL_BASE_URL environment variable.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Public read key sent as `x-buildll-key`.
    ///
    /// Set via BUILDLL_PUBLIC_API_KEY environment variable.
    #[serde(default)]
    pub public_api_key: Option<String>,

    /// Server-only bearer key for trusted backend reads.
    ///
    /// Set via BUILDLL_SERVER_API_KEY environment variable.
    /// Required only when `get_content_server` is called.
    #[serde(default)]
    pub server_api_key: Option<String>,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via BUILDLL_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via BUILDLL_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "buildll-rs/0.1".into()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            site_id: String::new(),
            deployment: Deployment::default(),
            base_url: None,
            public_api_key: None,
            server_api_key: None,
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Minimal configuration for a site with all other values defaulted.
    pub fn for_site(site_id: impl Into<String>) -> Self {
        Self { site_id: site_id.into(), ..Default::default() }
    }

    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base URL requests are issued against, without a trailing slash.
    pub fn resolved_base_url(&self) -> String {
        let base = self
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(self.deployment.default_base_url());
        base.trim().trim_end_matches('/').to_string()
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `BUILDLL_`
    /// 2. TOML file from `BUILDLL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Layered figment without extraction, for callers that merge more providers.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("BUILDLL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("BUILDLL_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Server key for privileged reads.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the server API key is not set.
    pub fn require_server_api_key(&self) -> Result<&str, ConfigError> {
        self.server_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "server_api_key".into(),
                hint: "Set BUILDLL_SERVER_API_KEY; server reads are for trusted backends only".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.site_id.is_empty());
        assert_eq!(config.deployment, Deployment::Hosted);
        assert_eq!(config.user_agent, "buildll-rs/0.1");
        assert_eq!(config.timeout_ms, 10_000);
        assert!(config.base_url.is_none());
        assert!(config.public_api_key.is_none());
        assert!(config.server_api_key.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn test_resolved_base_url_by_deployment() {
        let hosted = ClientConfig::for_site("s1");
        assert_eq!(hosted.resolved_base_url(), "https://api.buildll.com");

        let local = ClientConfig { deployment: Deployment::Local, ..ClientConfig::for_site("s1") };
        assert_eq!(local.resolved_base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn test_resolved_base_url_override_wins() {
        let config = ClientConfig {
            deployment: Deployment::Local,
            base_url: Some("https://cms.example.com/v2/".into()),
            ..ClientConfig::for_site("s1")
        };
        assert_eq!(config.resolved_base_url(), "https://cms.example.com/v2");

        let blank = ClientConfig { base_url: Some("  ".into()), ..ClientConfig::for_site("s1") };
        assert_eq!(blank.resolved_base_url(), HOSTED_BASE_URL);
    }

    #[test]
    fn test_require_server_api_key_missing() {
        let config = ClientConfig::for_site("s1");
        let result = config.require_server_api_key();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "server_api_key"));

        let empty = ClientConfig { server_api_key: Some(String::new()), ..ClientConfig::for_site("s1") };
        assert!(empty.require_server_api_key().is_err());
    }

    #[test]
    fn test_require_server_api_key_present() {
        let config = ClientConfig { server_api_key: Some("srv-key".into()), ..ClientConfig::for_site("s1") };
        assert_eq!(config.require_server_api_key().unwrap(), "srv-key");
    }

    #[test]
    fn test_load_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("BUILDLL_SITE_ID", "site-42");
            jail.set_env("BUILDLL_DEPLOYMENT", "local");
            jail.set_env("BUILDLL_PUBLIC_API_KEY", "pk_test");
            jail.set_env("BUILDLL_TIMEOUT_MS", "2500");

            let config = ClientConfig::load().expect("config should load");
            assert_eq!(config.site_id, "site-42");
            assert_eq!(config.deployment, Deployment::Local);
            assert_eq!(config.public_api_key.as_deref(), Some("pk_test"));
            assert_eq!(config.timeout_ms, 2500);
            Ok(())
        });
    }

    #[test]
    fn test_load_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "buildll.toml",
                r#"
                site_id = "from-file"
                base_url = "https://file.example.com"
                user_agent = "file-agent"
                "#,
            )?;
            jail.set_env("BUILDLL_CONFIG_FILE", "buildll.toml");
            jail.set_env("BUILDLL_SITE_ID", "from-env");

            let config = ClientConfig::load().expect("config should load");
            assert_eq!(config.site_id, "from-env");
            assert_eq!(config.resolved_base_url(), "https://file.example.com");
            assert_eq!(config.user_agent, "file-agent");
            Ok(())
        });
    }

    #[test]
    fn test_load_without_site_id_fails() {
        Jail::expect_with(|_jail| {
            let result = ClientConfig::load();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "site_id"));
            Ok(())
        });
    }
}
