//! Analysis report types and the wire mapping from the backend response.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

/// Visualization labels shown when the backend response does not list any.
pub const DEFAULT_VISUALIZATIONS: &[&str] = &[
    "Distribution plots for numerical columns",
    "Missing value heatmap",
    "Correlation matrix",
    "Outlier detection scatter plots",
];

/// Opaque backend identifier correlating an analysis with its artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportHandle(String);

impl ReportHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quality metrics and advice for one analysed dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: String,
    /// Percentage in the 0..=100 range as reported by the backend.
    pub data_quality: f64,
    pub missing_values: u64,
    pub outliers: u64,
    pub recommendations: Vec<String>,
    pub visualizations: Vec<String>,
}

impl AnalysisReport {
    /// Quality score formatted for display, e.g. `92%` or `87.5%`.
    pub fn quality_label(&self) -> String {
        if self.data_quality.fract() == 0.0 {
            format!("{:.0}%", self.data_quality)
        } else {
            format!("{}%", self.data_quality)
        }
    }
}

/// JSON body returned by `POST /analyze/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub report_id: String,
    pub summary: String,
    pub data_quality: f64,
    #[serde(deserialize_with = "deserialize_count")]
    pub missing_values: u64,
    #[serde(deserialize_with = "deserialize_count")]
    pub outliers: u64,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub visualizations: Option<Vec<String>>,
}

impl AnalysisResponse {
    /// Split the wire body into the report and its handle. Values pass
    /// through unchanged.
    pub fn into_parts(self) -> (AnalysisReport, ReportHandle) {
        let visualizations = self
            .visualizations
            .unwrap_or_else(|| DEFAULT_VISUALIZATIONS.iter().map(|label| label.to_string()).collect());
        let report = AnalysisReport {
            summary: self.summary,
            data_quality: self.data_quality,
            missing_values: self.missing_values,
            outliers: self.outliers,
            recommendations: self.recommendations,
            visualizations,
        };
        (report, ReportHandle(self.report_id))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireCount {
    Integer(u64),
    Float(f64),
}

/// Counts arrive as JSON numbers; integral floats such as `3.0` are accepted.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match WireCount::deserialize(deserializer)? {
        WireCount::Integer(count) => Ok(count),
        WireCount::Float(count) if count >= 0.0 && count.fract() == 0.0 && count <= u64::MAX as f64 => {
            Ok(count as u64)
        }
        WireCount::Float(count) => Err(de::Error::custom(format!(
            "expected a non-negative whole count, got {count}"
        ))),
    }
}

/// A report together with its handle. The two are always stored and
/// replaced as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub report: AnalysisReport,
    pub handle: ReportHandle,
    pub received_at: DateTime<Utc>,
}

impl StoredReport {
    pub fn new(report: AnalysisReport, handle: ReportHandle) -> Self {
        Self {
            report,
            handle,
            received_at: Utc::now(),
        }
    }
}
