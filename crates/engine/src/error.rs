//! Errors surfaced by the workflow controller.

use cleansight_api::ClientError;
use cleansight_util::SinkError;
use thiserror::Error;

/// Every failure the controller reports to the user.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Submit was called with nothing selected.
    #[error("no input supplied: choose a file or paste a dataset")]
    Validation,

    /// A submission is already in flight.
    #[error("an analysis is already in progress")]
    Busy,

    /// A report action was requested before any report exists.
    #[error("no report available")]
    NotReady,

    #[error("{}", transport_message(.status, .message))]
    Transport { status: u16, message: Option<String> },

    #[error("could not read the analysis response: {reason}")]
    Decode { reason: String },

    #[error("could not reach the analysis service: {reason}")]
    Network { reason: String },

    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: &'static str, timeout_ms: u64 },

    #[error("{operation} was cancelled")]
    Cancelled { operation: &'static str },

    #[error("could not save the download: {0}")]
    Save(#[from] SinkError),

    #[error("client configuration error: {reason}")]
    Configuration { reason: String },
}

impl WorkflowError {
    /// Whether the user can fix this by repeating the action later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Network { .. } | Self::Timeout { .. } | Self::Cancelled { .. } | Self::Save(_)
        )
    }
}

impl From<ClientError> for WorkflowError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Transport { status, message } => Self::Transport { status, message },
            ClientError::Decode { reason } => Self::Decode { reason },
            ClientError::Network(source) => Self::Network {
                reason: source.to_string(),
            },
            ClientError::EmptyInput => Self::Validation,
            ClientError::InvalidBaseUrl { .. } | ClientError::Build(_) => Self::Configuration {
                reason: error.to_string(),
            },
        }
    }
}

fn transport_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("the analysis service returned HTTP {status}: {message}"),
        None => format!("the analysis service returned HTTP {status}"),
    }
}
