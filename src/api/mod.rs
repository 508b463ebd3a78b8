//! Canvas API module.
//!
//! This module provides:
//! - The `CourseSource` trait the downloader traverses
//! - HTTP client for the Canvas REST API with pagination
//! - API response types

pub mod client;
pub mod source;
pub mod types;

pub use client::{api_base_url, CanvasApi, PAGE_SIZE};
pub use source::CourseSource;
pub use types::*;
