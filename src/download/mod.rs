//! Download module for course content.
//!
//! This module provides:
//! - Single file fetching with streamed writes
//! - Bounded concurrent dispatch of file batches
//! - Recursive folder mirroring
//! - Per-course orchestration of files and modules
//! - Download statistics

pub mod course;
pub mod dispatch;
pub mod fetch;
pub mod state;
pub mod walker;

#[cfg(test)]
pub(crate) mod testing;

pub use course::{CourseDownloader, ROOT_FOLDER_NAME};
pub use dispatch::{BatchReport, Dispatcher};
pub use fetch::{fetch_file, FetchOutcome, CHUNK_SIZE};
pub use state::{CourseOutcome, DownloadStats, RunStats};
pub use walker::FolderWalker;
