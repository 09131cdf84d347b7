//! Dataset input selection.
//!
//! A dataset reaches the backend either as an uploaded file or as pasted
//! text, never both. [`InputSelection`] encodes that exclusivity in the type.

use std::fmt;
use std::path::Path;

use tracing::warn;

/// Coarse format guess derived from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Excel,
    Json,
    Text,
    Unknown,
}

impl DatasetFormat {
    /// Classify a file name by its extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("csv") => Self::Csv,
            Some("xls") | Some("xlsx") => Self::Excel,
            Some("json") => Self::Json,
            Some("txt") => Self::Text,
            _ => Self::Unknown,
        }
    }

    /// MIME type sent with the multipart file part.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Excel => "application/vnd.ms-excel",
            Self::Json => "application/json",
            Self::Text => "text/plain",
            Self::Unknown => "application/octet-stream",
        }
    }

    /// The analysis backend parses CSV, Excel and JSON uploads only.
    pub fn is_backend_supported(self) -> bool {
        matches!(self, Self::Csv | Self::Excel | Self::Json)
    }
}

/// A dataset file picked by the user: its original name and raw contents.
#[derive(Clone, PartialEq, Eq)]
pub struct DatasetFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DatasetFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a dataset file from disk, keeping only its final path component
    /// as the upload name.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        let file = Self { file_name, bytes };
        if !file.format().is_backend_supported() {
            warn!(
                file = %file.file_name,
                "file extension is not one the analysis backend reads (csv, xls, xlsx, json)"
            );
        }
        Ok(file)
    }

    pub fn format(&self) -> DatasetFormat {
        DatasetFormat::from_file_name(&self.file_name)
    }
}

// Dataset bytes can be large; keep Debug output to the name and size.
impl fmt::Debug for DatasetFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The user's active dataset source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputSelection {
    #[default]
    None,
    File(DatasetFile),
    PastedText(String),
}

impl InputSelection {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short human label for status lines and logs.
    pub fn describe(&self) -> String {
        match self {
            Self::None => "no input".to_string(),
            Self::File(file) => format!("file {} ({} bytes)", file.file_name, file.bytes.len()),
            Self::PastedText(text) => format!("pasted text ({} chars)", text.chars().count()),
        }
    }
}
