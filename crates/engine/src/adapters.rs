//! Production implementations of the controller seams.

use std::path::PathBuf;

use async_trait::async_trait;
use cleansight_api::CleanSightClient;
use cleansight_types::{AnalysisReport, ArtifactKind, InputSelection, ReportHandle};
use cleansight_util::DirectorySink;

use crate::WorkflowError;
use crate::ports::{AnalysisService, ArtifactFetcher, ArtifactSink};

#[async_trait]
impl AnalysisService for CleanSightClient {
    async fn analyze(&self, input: &InputSelection) -> Result<(AnalysisReport, ReportHandle), WorkflowError> {
        Ok(CleanSightClient::analyze(self, input).await?)
    }
}

#[async_trait]
impl ArtifactFetcher for CleanSightClient {
    async fn fetch_artifact(&self, handle: &ReportHandle, kind: ArtifactKind) -> Result<Vec<u8>, WorkflowError> {
        Ok(CleanSightClient::fetch_artifact(self, handle, kind).await?)
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, WorkflowError> {
        Ok(DirectorySink::save(self, file_name, bytes).await?)
    }
}
