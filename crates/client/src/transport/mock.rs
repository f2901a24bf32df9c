//! In-process fake of the CMS API for tests.
//!
//! Serves sections from a map, applies writes to it, and records every
//! request so tests can count network calls.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use buildll_core::Error;
use buildll_core::content::{BatchRequest, BatchUpdate, ContentUpdate};

use super::{ApiRequest, ApiResponse, Method, Transport};

#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    sections: Mutex<BTreeMap<String, Value>>,
    failures: Mutex<HashMap<(Method, String), (u16, String)>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_section(self, id: &str, data: Value) -> Self {
        self.set_section(id, data);
        self
    }

    pub(crate) fn set_section(&self, id: &str, data: Value) {
        self.sections.lock().unwrap().insert(id.to_string(), data);
    }

    /// Answer `method path` with `status` and `body` until cleared.
    pub(crate) fn fail(&self, method: Method, path: &str, status: u16, body: &str) {
        self.failures.lock().unwrap().insert((method, path.to_string()), (status, body.to_string()));
    }

    pub(crate) fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn calls_to(&self, method: Method, path: &str) -> usize {
        self.requests.lock().unwrap().iter().filter(|r| r.method == method && r.path() == path).count()
    }

    fn section_json(&self, id: &str) -> Option<Value> {
        self.sections.lock().unwrap().get(id).map(|data| json!({ "id": id, "data": data }))
    }

    fn apply(&self, update: &ContentUpdate) {
        self.sections.lock().unwrap().insert(update.content_id.clone(), update.data.clone());
    }

    fn ok(body: &Value) -> ApiResponse {
        ApiResponse::new(200, body.to_string())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        self.requests.lock().unwrap().push(request.clone());

        let path = request.path();
        if let Some((status, body)) = self.failures.lock().unwrap().get(&(request.method, path.clone())) {
            return Ok(ApiResponse::new(*status, body.clone()));
        }

        let body = request.body.clone().unwrap_or(Value::Null);
        let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
        let response = match (request.method, segments.as_slice()) {
            (Method::Post, ["content", "batch"]) => {
                let batch: BatchRequest = serde_json::from_value(body)?;
                let results: Vec<Value> = batch
                    .section_ids
                    .iter()
                    .map(|id| json!({ "sectionId": id, "content": self.section_json(id) }))
                    .collect();
                Self::ok(&json!({ "results": results }))
            }
            (Method::Put, ["content", "batch"]) => {
                let batch: BatchUpdate = serde_json::from_value(body)?;
                batch.updates.iter().for_each(|u| self.apply(u));
                Self::ok(&json!({ "updated": batch.updates.len() }))
            }
            (Method::Get, ["content", id]) => match self.section_json(id) {
                Some(content) => Self::ok(&content),
                None => ApiResponse::new(404, r#"{"error":"not found"}"#),
            },
            (Method::Put, ["content", _]) => {
                let update: ContentUpdate = serde_json::from_value(body)?;
                self.apply(&update);
                Self::ok(&json!({ "updated": 1 }))
            }
            _ => ApiResponse::new(404, ""),
        };

        Ok(response)
    }
}
