//! Client settings for CleanSight.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. A JSON file (`~/.config/cleansight/settings.json` on most platforms,
//!    or the path in [`SETTINGS_PATH_ENV`]).
//! 2. Environment variables ([`API_BASE_ENV`], [`TIMEOUT_ENV`],
//!    [`DOWNLOAD_DIR_ENV`]).
//! 3. Explicit overrides, usually command-line flags.
//!
//! A missing file yields defaults. A file that cannot be parsed is logged and
//! ignored so a typo never locks the user out.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cleansight_api::{ClientError, DEFAULT_BASE_URL, validate_base_url};
use dirs_next::{config_dir, download_dir, home_dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable overriding the settings file path.
pub const SETTINGS_PATH_ENV: &str = "CLEANSIGHT_SETTINGS_PATH";
/// Environment variable overriding the backend base URL.
pub const API_BASE_ENV: &str = "CLEANSIGHT_API_BASE";
/// Environment variable overriding the per-request deadline in seconds.
pub const TIMEOUT_ENV: &str = "CLEANSIGHT_TIMEOUT_SECS";
/// Environment variable overriding where artifacts are saved.
pub const DOWNLOAD_DIR_ENV: &str = "CLEANSIGHT_DOWNLOAD_DIR";

/// Default filename for the JSON payload.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Analysis of large datasets can take a while on the backend.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Error surfaced when settings cannot be resolved.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// I/O failure (for example, permissions).
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// An environment variable holds a value of the wrong shape.
    #[error("invalid value '{value}' for {variable}: {reason}")]
    InvalidEnv {
        variable: &'static str,
        value: String,
        reason: String,
    },
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
    #[error(transparent)]
    BaseUrl(#[from] ClientError),
}

/// Fully resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub download_dir: PathBuf,
}

/// On-disk shape; every field is optional.
#[derive(Debug, Default, Clone, Deserialize)]
struct SettingsFile {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    download_dir: Option<String>,
}

/// Values supplied explicitly by the caller.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub download_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            download_dir: download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl Settings {
    /// Resolve settings from the default file location, the environment and
    /// `overrides`, then validate the result.
    pub fn resolve(overrides: SettingsOverrides) -> Result<Self, SettingsError> {
        let mut settings = Self::load_file(&default_settings_path())?;
        settings.apply_env()?;
        settings.apply_overrides(overrides);
        settings.validate()?;
        Ok(settings)
    }

    /// Read the settings file at `path`, falling back to defaults when it is
    /// missing or unparsable.
    pub fn load_file(path: &Path) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        let file = match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str::<SettingsFile>(&data) {
                Ok(file) => file,
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse settings file; using defaults"
                    );
                    SettingsFile::default()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file; using defaults");
                SettingsFile::default()
            }
            Err(error) => return Err(SettingsError::Io(error)),
        };

        if let Some(base_url) = file.base_url {
            settings.base_url = base_url;
        }
        if let Some(timeout) = file.request_timeout_secs {
            settings.request_timeout_secs = timeout;
        }
        if let Some(dir) = file.download_dir {
            settings.download_dir = expand_tilde(&dir);
        }
        Ok(settings)
    }

    /// Apply the `CLEANSIGHT_*` environment variables that are set and
    /// non-empty.
    pub fn apply_env(&mut self) -> Result<(), SettingsError> {
        if let Some(base_url) = non_empty_env(API_BASE_ENV) {
            self.base_url = base_url;
        }
        if let Some(raw) = non_empty_env(TIMEOUT_ENV) {
            self.request_timeout_secs = raw.parse().map_err(|error: std::num::ParseIntError| SettingsError::InvalidEnv {
                variable: TIMEOUT_ENV,
                value: raw.clone(),
                reason: error.to_string(),
            })?;
        }
        if let Some(dir) = non_empty_env(DOWNLOAD_DIR_ENV) {
            self.download_dir = expand_tilde(&dir);
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: SettingsOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(timeout) = overrides.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(dir) = overrides.download_dir {
            self.download_dir = dir;
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        validate_base_url(self.base_url.trim().trim_end_matches('/'))?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Path of the settings file honoring [`SETTINGS_PATH_ENV`].
pub fn default_settings_path() -> PathBuf {
    if let Some(path) = non_empty_env(SETTINGS_PATH_ENV) {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cleansight")
        .join(SETTINGS_FILE_NAME)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    match trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        Some(rest) => home().join(rest),
        None => PathBuf::from(trimmed),
    }
}

fn non_empty_env(variable: &str) -> Option<String> {
    env::var(variable)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
