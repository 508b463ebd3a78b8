//! Canvas Downloader - bulk download course files from Canvas LMS.
//!
//! For each selected course this library mirrors the `course files` folder
//! tree and every file linked from the course's modules into
//! `canvas_downloads/<course name>/`.
//!
//! # Features
//!
//! - Recursive folder mirroring with filesystem-safe names
//! - Module file items downloaded into one folder per module
//! - Bounded concurrent downloads
//! - Per-file, per-module and per-course failure isolation
//! - Course folders act as a resume marker: existing courses are skipped
//!
//! # Example
//!
//! ```no_run
//! use canvas_downloader::{CanvasApi, Config, CourseDownloader, Dispatcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(std::path::Path::new("config.toml"))?;
//!     let api = CanvasApi::new(
//!         &config.account.base_url,
//!         config.account.access_token.clone(),
//!         config.request_timeout(),
//!         config.retry_policy(),
//!     )?;
//!     let dispatcher = Dispatcher::new(
//!         api.http_client(),
//!         config.options.max_threads,
//!         config.retry_policy(),
//!     );
//!
//!     let outcome = CourseDownloader::new(&api, &dispatcher, &config)
//!         .download_course(42)
//!         .await;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod retry;

// Re-exports for convenience
pub use api::{CanvasApi, CourseSource};
pub use config::Config;
pub use download::{CourseDownloader, CourseOutcome, Dispatcher, DownloadStats, RunStats};
pub use error::{Error, Result};
pub use fs::sanitize_name;
