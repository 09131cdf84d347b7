use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Downloadable outputs generated by the backend for a finished analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// The formatted PDF report.
    ReportDocument,
    /// The cleaned CSV dataset.
    PreprocessedDataset,
}

impl ArtifactKind {
    /// Endpoint prefix; the report id is appended as the final path segment.
    pub fn endpoint_prefix(self) -> &'static str {
        match self {
            Self::ReportDocument => "/download-report/",
            Self::PreprocessedDataset => "/download-preprocessed/",
        }
    }

    /// Fixed file name the artifact is saved under.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::ReportDocument => "DataQualityReport.pdf",
            Self::PreprocessedDataset => "PreprocessedDataset.csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ReportDocument => "report-document",
            Self::PreprocessedDataset => "preprocessed-dataset",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ArtifactKind {
    type Err = ParseArtifactKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "report" | "report-document" | "pdf" => Ok(Self::ReportDocument),
            "preprocessed" | "preprocessed-dataset" | "csv" => Ok(Self::PreprocessedDataset),
            _ => Err(ParseArtifactKindError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseArtifactKindError;

impl fmt::Display for ParseArtifactKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid artifact kind; expected 'report' or 'preprocessed'")
    }
}

impl Error for ParseArtifactKindError {}
