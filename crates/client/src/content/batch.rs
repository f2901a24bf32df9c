//! Multi-section reads with request coalescing.
//!
//! 1. A fresh batch entry for the exact (sorted, de-duplicated) id set is
//!    returned as-is, even if individual entries have since changed. The
//!    entry must hold every requested id; otherwise it is ignored.
//! 2. Otherwise ids with a fresh individual entry are served from cache.
//! 3. If nothing is left, the merged result is returned without a request.
//! 4. The remaining ids go out in one batch request; a failure caches nothing.
//! 5. Each returned section is cached under its own key, and the merged map
//!    under the batch key.

use std::collections::BTreeSet;

use buildll_core::cache::{batch_key, content_key};
use buildll_core::content::{BatchRequest, BatchResult};
use buildll_core::{BatchContent, CachedValue, Error};

use super::{BuildllClient, validate_section_id};
use crate::transport::{ApiRequest, Method};

impl BuildllClient {
    /// Fetch several sections, reusing cached entries and fetching the rest in one request.
    ///
    /// Duplicate ids are allowed and treated as one.
    pub async fn get_batch_content<S: AsRef<str>>(&self, section_ids: &[S]) -> Result<BatchContent, Error> {
        if section_ids.is_empty() {
            return Err(Error::InvalidInput("section ids cannot be empty".into()));
        }
        let ids: BTreeSet<&str> = section_ids.iter().map(|id| id.as_ref()).collect();
        for id in &ids {
            validate_section_id(id)?;
        }

        let key = batch_key(&self.config.site_id, section_ids);
        if let Some(CachedValue::BatchFound(hit)) = self.cache.get(&key).await {
            // ids may contain ',' so distinct id sets can share a key
            if ids.iter().all(|id| hit.contains_key(*id)) {
                tracing::debug!(site_id = %self.config.site_id, key = %key, "batch cache hit");
                return Ok(hit);
            }
            tracing::debug!(site_id = %self.config.site_id, key = %key, "batch entry does not cover requested ids");
        }

        let mut merged = BatchContent::new();
        let mut uncached = Vec::new();
        for id in ids {
            match self.cache.get(&content_key(&self.config.site_id, id)).await.and_then(CachedValue::into_section) {
                Some(content) => {
                    merged.insert(id.to_string(), content);
                }
                None => uncached.push(id.to_string()),
            }
        }

        if uncached.is_empty() {
            tracing::debug!(site_id = %self.config.site_id, count = merged.len(), "batch fully served from cache");
            return Ok(merged);
        }

        tracing::debug!(
            site_id = %self.config.site_id,
            cached = merged.len(),
            fetching = uncached.len(),
            "batch cache partial miss"
        );

        let body = serde_json::to_value(BatchRequest { section_ids: uncached })?;
        let request = ApiRequest::new(Method::Post, &["content", "batch"], self.public_auth()).with_body(body);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(Error::Fetch { status: response.status, body: None });
        }
        let fetched: BatchResult = response.json()?;

        for item in fetched.results {
            self.cache
                .put(content_key(&self.config.site_id, &item.section_id), item.content.clone().into())
                .await;
            merged.insert(item.section_id, item.content);
        }
        self.cache.put(key, CachedValue::BatchFound(merged.clone())).await;

        Ok(merged)
    }
}
