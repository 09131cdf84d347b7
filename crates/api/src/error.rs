//! Error types for backend calls.

use serde_json::Value;
use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid backend URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request never produced a response (refused, reset, DNS).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{}", transport_message(.status, .message))]
    Transport { status: u16, message: Option<String> },

    /// The response body could not be decoded into the expected shape.
    #[error("malformed response body: {reason}")]
    Decode { reason: String },

    #[error("no dataset supplied")]
    EmptyInput,
}

impl ClientError {
    pub fn invalid_base_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Build a transport error from a failed response body, keeping the
    /// backend's own message when it sent one.
    pub fn transport(status: u16, body: &str) -> Self {
        Self::Transport {
            status,
            message: backend_message(body),
        }
    }

    /// HTTP status of a transport failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn transport_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("backend returned HTTP {status}: {message}"),
        None => format!("backend returned HTTP {status}"),
    }
}

/// Extract `error` (explicit JSON error responses) or `detail` (framework
/// exceptions) from an error body.
fn backend_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let field = value.get("error").or_else(|| value.get("detail"))?;
    match field {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
