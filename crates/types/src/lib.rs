//! Shared domain types for the CleanSight client.
//!
//! The types here are transport-agnostic: the API crate turns them into
//! HTTP requests and the engine crate stores them as workflow state.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod artifact;
pub mod input;
pub mod report;

pub use artifact::{ArtifactKind, ParseArtifactKindError};
pub use input::{DatasetFile, DatasetFormat, InputSelection};
pub use report::{AnalysisReport, AnalysisResponse, DEFAULT_VISUALIZATIONS, ReportHandle, StoredReport};

/// Lifecycle of the most recent submission.
///
/// `Submitting` is the only transient state. The other three are resting
/// states from which a new submission may begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionState {
    /// Whether a new submission may start from this state.
    pub fn accepts_submission(self) -> bool {
        !matches!(self, Self::Submitting)
    }

    /// Whether a loading indicator should be shown.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Submitting)
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}
