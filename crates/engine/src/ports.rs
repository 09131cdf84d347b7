//! Seams between the controller and the outside world.
//!
//! The controller only talks to these traits. Production wiring lives in
//! [`crate::adapters`]; tests substitute recorders.

use std::path::PathBuf;

use async_trait::async_trait;
use cleansight_types::{AnalysisReport, ArtifactKind, InputSelection, ReportHandle};
use tracing::{error, info};

use crate::WorkflowError;

/// Submits a dataset and returns the decoded report.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, input: &InputSelection) -> Result<(AnalysisReport, ReportHandle), WorkflowError>;
}

/// Retrieves generated artifacts by report handle.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch_artifact(&self, handle: &ReportHandle, kind: ArtifactKind) -> Result<Vec<u8>, WorkflowError>;
}

/// The "save as file" step of a download.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Persist `bytes` under `file_name` and return where they ended up.
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, WorkflowError>;
}

/// User-facing notifications.
pub trait Notifier: Send + Sync {
    /// A blocking, user-visible error message.
    fn error(&self, error: &WorkflowError);

    /// Informational message (e.g. where a download was saved).
    fn info(&self, message: &str);
}

/// Notifier that only writes to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, error: &WorkflowError) {
        error!(%error, "workflow error");
    }

    fn info(&self, message: &str) {
        info!("{message}");
    }
}
