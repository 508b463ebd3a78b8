//! Configuration module for the canvas-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{AccountConfig, Config, CoursesConfig, OptionsConfig, DEFAULT_DOWNLOAD_DIRECTORY};
pub use validation::validate_config;
