//! reqwest-backed transport.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, header};
use url::Url;

use buildll_core::{ClientConfig, ConfigError, Error};

use super::{ApiRequest, ApiResponse, Auth, Method, Transport};

/// Header carrying the public read key.
pub const PUBLIC_KEY_HEADER: &str = "x-buildll-key";

/// HTTP transport against a fixed API base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for `base_url`.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::Invalid { field: "base_url".into(), reason: e.to_string() })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid { field: "base_url".into(), reason: "cannot be a base URL".into() }.into());
        }

        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    /// Create a transport from the resolved base URL, timeout, and user agent in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        Self::new(&config.resolved_base_url(), config.timeout(), &config.user_agent)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, segments: &[String]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let start = Instant::now();
        let url = self.url_for(&request.segments);

        let mut builder = match request.method {
            Method::Get => self.http.get(url.clone()),
            Method::Post => self.http.post(url.clone()),
            Method::Put => self.http.put(url.clone()),
        };
        builder = builder.header(header::ACCEPT, "application/json");
        builder = match &request.auth {
            Auth::PublicKey(key) => builder.header(PUBLIC_KEY_HEADER, key),
            Auth::Bearer(token) => builder.bearer_auth(token),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() { Error::Timeout(e.to_string()) } else { Error::Transport(e.to_string()) }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response: {e}")))?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            bytes = body.len(),
            "api request completed"
        );

        Ok(ApiResponse { status, body })
    }
}
