//! Transport seam between the content client and the CMS API.
//!
//! The client only speaks in [`ApiRequest`]/[`ApiResponse`] pairs; the
//! reqwest-backed [`HttpTransport`] turns them into real HTTP calls, and
//! tests substitute a fake that records every request.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use buildll_core::Error;

pub use http::HttpTransport;

/// HTTP methods used by the CMS API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        })
    }
}

/// Credential attached to a request.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// Public read key, sent as `x-buildll-key`.
    PublicKey(String),
    /// Bearer token (server key or write token), sent as `Authorization`.
    Bearer(String),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::PublicKey(_) => f.write_str("PublicKey(..)"),
            Auth::Bearer(_) => f.write_str("Bearer(..)"),
        }
    }
}

/// A request against the API, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path segments; each is percent-encoded by the transport.
    pub segments: Vec<String>,
    pub auth: Auth,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, segments: &[&str], auth: Auth) -> Self {
        Self { method, segments: segments.iter().map(|s| (*s).to_string()).collect(), auth, body: None }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Unencoded path, for logging.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Status and raw body of an API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Decode the body as JSON, treating an empty body as `null`.
    pub fn json_or_null(&self) -> Result<serde_json::Value, Error> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        self.json()
    }

    /// Body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends API requests.
///
/// Implementations surface transport failures as [`Error::Timeout`] or
/// [`Error::Transport`] and never interpret HTTP status codes.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_path() {
        let req = ApiRequest::new(Method::Get, &["content", "hero"], Auth::PublicKey("pk".into()));
        assert_eq!(req.path(), "/content/hero");
        assert!(req.body.is_none());

        let req = req.with_body(json!({"a": 1}));
        assert_eq!(req.body, Some(json!({"a": 1})));
    }

    #[test]
    fn test_auth_debug_hides_secret() {
        let auth = Auth::Bearer("super-secret".into());
        assert!(!format!("{auth:?}").contains("super-secret"));
    }

    #[test]
    fn test_response_status_helpers() {
        assert!(ApiResponse::new(200, "{}").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(404, "").is_success());
        assert!(ApiResponse::new(404, "").is_not_found());
        assert!(!ApiResponse::new(500, "").is_not_found());
    }

    #[test]
    fn test_response_json_or_null() {
        assert_eq!(ApiResponse::new(204, "").json_or_null().unwrap(), serde_json::Value::Null);
        assert_eq!(ApiResponse::new(200, " \n").json_or_null().unwrap(), serde_json::Value::Null);
        assert_eq!(ApiResponse::new(200, r#"{"ok":true}"#).json_or_null().unwrap(), json!({"ok": true}));
        assert!(matches!(ApiResponse::new(200, "<html>").json_or_null(), Err(Error::Parse(_))));
    }
}
