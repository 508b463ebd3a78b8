//! API response type definitions.

use serde::Deserialize;

/// A course visible to the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Course {
    pub id: u64,
    /// Courses restricted by date come back without a name.
    #[serde(default)]
    pub name: String,
}

/// A folder in a course's file storage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFolder {
    pub id: u64,
    pub name: String,
    /// Path from the root, e.g. `course files/Week 1`.
    pub full_name: String,
}

/// A downloadable file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    pub id: u64,
    pub display_name: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl RemoteFile {
    /// Download URL, treating the empty string sent for locked files as absent.
    pub fn download_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

/// A course module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteModule {
    pub id: u64,
    pub name: String,
}

/// Kind of content a module item points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ModuleItemType {
    File,
    Page,
    Discussion,
    Assignment,
    Quiz,
    SubHeader,
    ExternalUrl,
    ExternalTool,
    #[serde(other)]
    Other,
}

/// An entry inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteModuleItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub item_type: ModuleItemType,
    #[serde(default)]
    pub content_id: Option<u64>,
}

/// Canvas error body, e.g. `{"errors":[{"message":"..."}]}`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorBody {
    /// Join all error messages into one line.
    pub fn summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
