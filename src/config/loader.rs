//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// Default root for all course directories.
pub const DEFAULT_DOWNLOAD_DIRECTORY: &str = "canvas_downloads";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub courses: CoursesConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Canvas instance and credentials.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountConfig {
    /// Instance URL, e.g. `https://school.instructure.com/`.
    #[serde(default)]
    pub base_url: String,

    /// Personal access token.
    #[serde(default)]
    pub access_token: String,
}

/// Course selection.
#[derive(Debug, Clone, Deserialize)]
pub struct CoursesConfig {
    /// Course IDs to download, in order.
    #[serde(default)]
    pub ids: Vec<u64>,

    /// Download every listed course instead of `ids`.
    #[serde(default)]
    pub all: bool,

    /// Enrollment states used when listing courses.
    #[serde(default = "default_enrollment_states")]
    pub enrollment_states: Vec<String>,
}

impl Default for CoursesConfig {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            all: false,
            enrollment_states: default_enrollment_states(),
        }
    }
}

/// Download options configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsConfig {
    /// Root directory holding one subdirectory per course.
    #[serde(default = "default_download_directory")]
    pub download_directory: PathBuf,

    /// Maximum simultaneous file downloads.
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,

    /// Whether to show per-batch progress bars.
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Folders nested deeper than this are skipped.
    #[serde(default = "default_max_folder_depth")]
    pub max_folder_depth: usize,

    /// Timeout for a single API request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Retries for rate-limited requests.
    #[serde(default = "default_rate_limit_retries")]
    pub rate_limit_retries: u32,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: default_download_directory(),
            max_threads: default_max_threads(),
            show_progress: true,
            max_folder_depth: default_max_folder_depth(),
            request_timeout_seconds: default_request_timeout(),
            rate_limit_retries: default_rate_limit_retries(),
        }
    }
}

fn default_enrollment_states() -> Vec<String> {
    vec!["active".to_string(), "completed".to_string()]
}

fn default_download_directory() -> PathBuf {
    PathBuf::from(DEFAULT_DOWNLOAD_DIRECTORY)
}

fn default_max_threads() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_max_folder_depth() -> usize {
    64
}

fn default_request_timeout() -> u64 {
    60
}

fn default_rate_limit_retries() -> u32 {
    3
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Root directory for course downloads.
    pub fn download_directory(&self) -> &Path {
        &self.options.download_directory
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.options.request_timeout_seconds)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.options.rate_limit_retries,
            ..RetryPolicy::default()
        }
    }
}
