//! Content payload types exchanged with the CMS API.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A single content section as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentResponse<T = serde_json::Value> {
    pub id: String,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ContentMeta>,
}

/// Version metadata attached to a section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

impl ContentResponse<serde_json::Value> {
    /// Decode the dynamic payload into a typed one.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<ContentResponse<T>, Error> {
        Ok(ContentResponse { id: self.id.clone(), data: serde_json::from_value(self.data.clone())?, meta: self.meta.clone() })
    }
}

/// Result of a multi-section read, keyed by section id.
pub type BatchContent = BTreeMap<String, Option<ContentResponse>>;

/// Raw body of a batch read response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    #[serde(default)]
    pub results: Vec<BatchItem>,
}

/// One section inside a batch read response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub section_id: String,
    #[serde(default)]
    pub content: Option<ContentResponse>,
}

/// Body of a batch read request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub section_ids: Vec<String>,
}

/// A single section write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdate {
    pub content_id: String,
    pub data: serde_json::Value,
}

impl ContentUpdate {
    pub fn new(content_id: impl Into<String>, data: serde_json::Value) -> Self {
        Self { content_id: content_id.into(), data }
    }
}

/// Body of a multi-section write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUpdate {
    pub updates: Vec<ContentUpdate>,
}
