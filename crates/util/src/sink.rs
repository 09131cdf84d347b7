//! Saving downloaded artifacts to a directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Upper bound on `Name (n).ext` candidates before giving up.
const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no free file name for {file_name} in {dir}")]
    NoFreeName { dir: PathBuf, file_name: String },
}

/// Writes artifacts into one directory. An existing file is never
/// overwritten: the next free `Name (n).ext` is used instead.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `bytes` under `file_name` (or a numbered variant) and return the
    /// path written.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, SinkError> {
        fs::create_dir_all(&self.dir).await.map_err(|source| SinkError::Write {
            path: self.dir.clone(),
            source,
        })?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(numbered_name(file_name, attempt));
            // create_new makes the existence check and creation one step.
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => file,
                Err(error) if error.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(SinkError::Write { path, source }),
            };
            let written = async {
                file.write_all(bytes).await?;
                file.flush().await
            }
            .await;
            if let Err(source) = written {
                return Err(SinkError::Write { path, source });
            }
            info!(path = %path.display(), bytes = bytes.len(), "artifact saved");
            return Ok(path);
        }

        Err(SinkError::NoFreeName {
            dir: self.dir.clone(),
            file_name: file_name.to_string(),
        })
    }
}

/// `Report.pdf` for attempt 0, then `Report (1).pdf`, `Report (2).pdf`, ...
fn numbered_name(file_name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => format!("{stem} ({attempt}).{extension}"),
        _ => format!("{file_name} ({attempt})"),
    }
}
