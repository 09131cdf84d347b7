//! Dataset submission to `POST /analyze/`.

use cleansight_types::{AnalysisReport, AnalysisResponse, InputSelection, ReportHandle};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::{CleanSightClient, ClientError};

const ANALYZE_PATH: &str = "/analyze/";
const FILE_FIELD: &str = "file";
const PASTED_FIELD: &str = "pasted_data";

impl CleanSightClient {
    /// Submit a dataset for analysis and decode the resulting report.
    ///
    /// Exactly one multipart field is populated: `file` for an uploaded
    /// dataset (original file name preserved) or `pasted_data` for raw text.
    /// Non-success statuses map to [`ClientError::Transport`] and malformed
    /// bodies to [`ClientError::Decode`]. There are no retries.
    pub async fn analyze(&self, input: &InputSelection) -> Result<(AnalysisReport, ReportHandle), ClientError> {
        let form = build_form(input)?;
        debug!(input = %input.describe(), "submitting dataset for analysis");

        let response = self
            .request(Method::POST, ANALYZE_PATH)
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::Network)?;
        if !status.is_success() {
            return Err(ClientError::transport(status.as_u16(), &body));
        }

        let decoded: AnalysisResponse = serde_json::from_str(&body).map_err(|error| ClientError::Decode {
            reason: error.to_string(),
        })?;
        let (report, handle) = decoded.into_parts();
        info!(report_id = %handle, data_quality = report.data_quality, "analysis completed");
        Ok((report, handle))
    }
}

fn build_form(input: &InputSelection) -> Result<Form, ClientError> {
    match input {
        InputSelection::None => Err(ClientError::EmptyInput),
        InputSelection::File(file) => {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(file.format().mime_type())
                .map_err(ClientError::Build)?;
            Ok(Form::new().part(FILE_FIELD, part))
        }
        InputSelection::PastedText(text) => Ok(Form::new().text(PASTED_FIELD, text.clone())),
    }
}
