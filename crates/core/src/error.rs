//! Unified error types for buildll.
//!
//! Every message carries a stable code prefix so callers and logs can match on
//! the failure class without parsing the detail text.

use crate::config::ConfigError;

/// Unified error type for content reads, writes, and configuration.
///
/// A 404 on a read is not represented here: it is a successful `None`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty section id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Non-success HTTP response (any non-2xx on writes, non-2xx non-404 on reads).
    #[error("FETCH_ERROR: status {status}{}", body_suffix(.body))]
    Fetch { status: u16, body: Option<String> },

    /// A privileged operation is missing its credential, or config is invalid.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    /// Request timed out in the transport.
    #[error("TIMEOUT: {0}")]
    Timeout(String),

    /// Network or transport failure (DNS, connection reset, TLS).
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),

    /// Response body could not be decoded.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// Edit attempted outside editor mode without a write token.
    #[error("EDITOR_DISABLED: not in editor mode and no write token supplied")]
    EditorDisabled,
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref().map(|b| format!(" {b}")).unwrap_or_default()
}

impl Error {
    /// HTTP status carried by a fetch failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
