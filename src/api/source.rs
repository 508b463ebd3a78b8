//! The remote operations the downloader depends on.

use async_trait::async_trait;

use crate::api::types::{Course, RemoteFile, RemoteFolder, RemoteModule, RemoteModuleItem};
use crate::error::Result;

/// Read-only view of an LMS instance.
///
/// Implementations must report a missing resource as [`Error::NotFound`] and
/// a forbidden one as [`Error::Unauthorized`]; the traversal decides how far
/// a failure reaches based on those two variants.
///
/// [`Error::NotFound`]: crate::error::Error::NotFound
/// [`Error::Unauthorized`]: crate::error::Error::Unauthorized
#[async_trait]
pub trait CourseSource: Send + Sync {
    /// List courses the user is enrolled in with any of the given states.
    async fn list_courses(&self, enrollment_states: &[String]) -> Result<Vec<Course>>;

    async fn get_course(&self, course_id: u64) -> Result<Course>;

    async fn list_folders(&self, course_id: u64) -> Result<Vec<RemoteFolder>>;

    async fn list_folder_files(&self, folder_id: u64) -> Result<Vec<RemoteFile>>;

    async fn list_subfolders(&self, folder_id: u64) -> Result<Vec<RemoteFolder>>;

    async fn list_modules(&self, course_id: u64) -> Result<Vec<RemoteModule>>;

    async fn list_module_items(
        &self,
        course_id: u64,
        module_id: u64,
    ) -> Result<Vec<RemoteModuleItem>>;

    async fn get_file(&self, file_id: u64) -> Result<RemoteFile>;
}
