//! Cached content client for the buildll CMS API.
//!
//! ### Read path
//! - Single-section reads go through a site-scoped cache with a fixed
//!   5-minute TTL. A 404 is cached as "not found" so known-missing sections
//!   don't hit the network again until the entry expires.
//! - Batch reads are memoized per exact id set and otherwise only fetch the
//!   sections that are not individually cached (see [`batch`]).
//! - Server reads authenticate with the server key and never touch the cache.
//!
//! ### Write path
//! - Writes authenticate with a caller-supplied write token.
//! - A successful write drops the written keys and then every key of the
//!   site, since any write can change any batch result. A failed write
//!   leaves the cache untouched (see [`write`]).
//!
//! Concurrent reads of the same key are not coalesced in flight; whichever
//! response lands last wins the cache slot.

pub mod batch;
pub mod write;

use std::sync::Arc;

use buildll_core::cache::content_key;
use buildll_core::{CachedValue, ClientConfig, ContentCache, ContentResponse, Error};

use crate::transport::{ApiRequest, Auth, HttpTransport, Method, Transport};

/// Content client bound to one site.
///
/// Cloning is cheap; clones share the transport and the cache.
#[derive(Debug, Clone)]
pub struct BuildllClient {
    transport: Arc<dyn Transport>,
    cache: Arc<ContentCache>,
    config: ClientConfig,
}

impl BuildllClient {
    /// Create a client over HTTP with its own cache.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::from_config(&config)?);
        Self::with_transport(config, transport, Arc::new(ContentCache::new()))
    }

    /// Create a client from `BUILDLL_*` environment and config file.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(ClientConfig::load()?)
    }

    /// Create a client over an arbitrary transport and cache.
    ///
    /// The cache may be shared with clients for other sites; keys are
    /// prefixed with the site id so entries never collide.
    pub fn with_transport(
        config: ClientConfig, transport: Arc<dyn Transport>, cache: Arc<ContentCache>,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { transport, cache, config })
    }

    pub fn site_id(&self) -> &str {
        &self.config.site_id
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    /// Fetch one section, serving fresh cache entries without a network call.
    ///
    /// Returns `Ok(None)` when the API answers 404; that outcome is cached too.
    /// Any other non-success status fails with [`Error::Fetch`] and is not cached.
    pub async fn get_content(&self, section_id: &str) -> Result<Option<ContentResponse>, Error> {
        validate_section_id(section_id)?;

        let key = content_key(&self.config.site_id, section_id);
        if let Some(cached) = self.cache.get(&key).await.and_then(CachedValue::into_section) {
            tracing::debug!(site_id = %self.config.site_id, section_id, "content cache hit");
            return Ok(cached);
        }

        tracing::debug!(site_id = %self.config.site_id, section_id, "content cache miss");
        let content = self.fetch_section(section_id, self.public_auth()).await?;
        self.cache.put(key, content.clone().into()).await;

        Ok(content)
    }

    /// Fetch one section with the server key, bypassing the cache.
    ///
    /// For trusted backends only. Fails with [`Error::Config`] when no server
    /// key is configured. A 404 yields `Ok(None)` and is not cached.
    pub async fn get_content_server(&self, section_id: &str) -> Result<Option<ContentResponse>, Error> {
        validate_section_id(section_id)?;

        let server_key = self.config.require_server_api_key()?;
        self.fetch_section(section_id, Auth::Bearer(server_key.to_string())).await
    }

    /// Drop the cached entry for one section.
    pub async fn invalidate_section(&self, section_id: &str) -> bool {
        self.cache.invalidate(&content_key(&self.config.site_id, section_id)).await
    }

    /// Drop every cached entry of this site. Returns how many were removed.
    pub async fn invalidate_all(&self) -> usize {
        self.cache.invalidate_site(&self.config.site_id).await
    }

    async fn fetch_section(&self, section_id: &str, auth: Auth) -> Result<Option<ContentResponse>, Error> {
        let request = ApiRequest::new(Method::Get, &["content", section_id], auth);
        let response = self.transport.send(request).await?;

        if response.is_not_found() {
            tracing::debug!(site_id = %self.config.site_id, section_id, "section not found");
            return Ok(None);
        }
        if !response.is_success() {
            return Err(Error::Fetch { status: response.status, body: None });
        }

        response.json().map(Some)
    }

    fn public_auth(&self) -> Auth {
        Auth::PublicKey(self.config.public_api_key.clone().unwrap_or_default())
    }
}

pub(crate) fn validate_section_id(section_id: &str) -> Result<(), Error> {
    if section_id.is_empty() {
        return Err(Error::InvalidInput("section id cannot be empty".into()));
    }
    Ok(())
}
