//! Filesystem module.
//!
//! Provides:
//! - Filesystem-safe name sanitization
//! - Course and folder path management

pub mod naming;
pub mod paths;

pub use naming::sanitize_name;
pub use paths::{child_folder, ensure_dir, get_course_folder};
