//! Authenticated writes and cache invalidation.
//!
//! A successful write removes the written section keys and then every key of
//! the site, batch entries included. A failed write returns
//! [`Error::Fetch`] with the response body and invalidates nothing.

use buildll_core::cache::content_key;
use buildll_core::content::BatchUpdate;
use buildll_core::{ContentUpdate, Error};
use serde_json::Value;

use super::{BuildllClient, validate_section_id};
use crate::transport::{ApiRequest, ApiResponse, Auth, Method};

impl BuildllClient {
    /// Write a partial update to one section.
    ///
    /// Returns the API's JSON response (`null` for an empty body).
    pub async fn update_content(&self, section_id: &str, patch: Value, write_token: &str) -> Result<Value, Error> {
        validate_section_id(section_id)?;
        let auth = write_auth(write_token)?;

        let body = serde_json::to_value(ContentUpdate::new(section_id, patch))?;
        let request = ApiRequest::new(Method::Put, &["content", section_id], auth).with_body(body);
        let outcome = write_outcome(self.transport.send(request).await?)?;

        self.cache.invalidate(&content_key(&self.config.site_id, section_id)).await;
        let removed = self.cache.invalidate_site(&self.config.site_id).await;
        tracing::debug!(site_id = %self.config.site_id, section_id, removed, "content updated, site cache invalidated");

        Ok(outcome)
    }

    /// Write updates to several sections in one request.
    pub async fn update_batch_content(&self, updates: Vec<ContentUpdate>, write_token: &str) -> Result<Value, Error> {
        if updates.is_empty() {
            return Err(Error::InvalidInput("updates cannot be empty".into()));
        }
        for update in &updates {
            validate_section_id(&update.content_id)?;
        }
        let auth = write_auth(write_token)?;

        let section_ids: Vec<String> = updates.iter().map(|u| u.content_id.clone()).collect();
        let body = serde_json::to_value(BatchUpdate { updates })?;
        let request = ApiRequest::new(Method::Put, &["content", "batch"], auth).with_body(body);
        let outcome = write_outcome(self.transport.send(request).await?)?;

        for id in &section_ids {
            self.cache.invalidate(&content_key(&self.config.site_id, id)).await;
        }
        let removed = self.cache.invalidate_site(&self.config.site_id).await;
        tracing::debug!(
            site_id = %self.config.site_id,
            sections = section_ids.len(),
            removed,
            "batch updated, site cache invalidated"
        );

        Ok(outcome)
    }
}

fn write_auth(write_token: &str) -> Result<Auth, Error> {
    if write_token.trim().is_empty() {
        return Err(Error::InvalidInput("write token cannot be empty".into()));
    }
    Ok(Auth::Bearer(write_token.to_string()))
}

fn write_outcome(response: ApiResponse) -> Result<Value, Error> {
    if !response.is_success() {
        return Err(Error::Fetch { status: response.status, body: Some(response.text()) });
    }
    response.json_or_null()
}
