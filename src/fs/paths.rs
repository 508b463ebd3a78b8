//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::fs::naming::sanitize_name;

/// Local directory for a course, `<download_root>/<sanitized name>`.
pub fn get_course_folder(config: &Config, course_name: &str) -> PathBuf {
    config.download_directory().join(sanitize_name(course_name))
}

/// Child directory of `parent` for a remote folder or module name.
pub fn child_folder(parent: &Path, remote_name: &str) -> PathBuf {
    parent.join(sanitize_name(remote_name))
}

/// Ensure a directory exists, creating it if necessary. Safe to repeat.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}
