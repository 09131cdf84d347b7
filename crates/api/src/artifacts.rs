//! Artifact retrieval by report id.

use cleansight_types::{ArtifactKind, ReportHandle};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use tracing::debug;

use crate::{CleanSightClient, ClientError};

/// Characters left unescaped in a path segment (RFC 3986 unreserved set).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// API-relative path for an artifact, with the handle encoded as a single
/// path segment.
pub fn artifact_path(handle: &ReportHandle, kind: ArtifactKind) -> String {
    format!(
        "{}{}",
        kind.endpoint_prefix(),
        utf8_percent_encode(handle.as_str(), PATH_SEGMENT)
    )
}

impl CleanSightClient {
    /// Download the raw bytes of an artifact.
    ///
    /// Stateless pass-through: non-success statuses map to
    /// [`ClientError::Transport`], nothing is retried or cached.
    pub async fn fetch_artifact(&self, handle: &ReportHandle, kind: ArtifactKind) -> Result<Vec<u8>, ClientError> {
        let path = artifact_path(handle, kind);
        debug!(%kind, %path, "fetching artifact");

        let response = self
            .request(Method::GET, &path)
            .send()
            .await
            .map_err(ClientError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::transport(status.as_u16(), &body));
        }
        let bytes = response.bytes().await.map_err(ClientError::Network)?;
        Ok(bytes.to_vec())
    }
}
