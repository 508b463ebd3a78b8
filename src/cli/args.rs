//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Canvas course downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "canvas-downloader",
    version,
    about = "Bulk download course files from Canvas LMS",
    long_about = "Downloads the 'course files' tree and every file linked from course modules\n\
                  for the selected Canvas courses into one folder per course.\n\n\
                  Courses whose folder already exists are skipped."
)]
pub struct Args {
    /// Canvas base URL (e.g. https://[institution].instructure.com/).
    #[arg(long = "url", env = "CANVAS_API_URL")]
    pub base_url: Option<String>,

    /// Canvas personal access token.
    #[arg(short, long, env = "CANVAS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Course ID(s) to download.
    #[arg(short = 'c', long = "course", num_args = 1..)]
    pub courses: Option<Vec<u64>>,

    /// Download every course you are enrolled in.
    #[arg(long, conflicts_with = "courses")]
    pub all: bool,

    /// List available courses and exit.
    #[arg(long)]
    pub list: bool,

    /// Root directory for course folders.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Maximum number of simultaneous downloads.
    #[arg(short = 'j', long = "threads", value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// Path to configuration file.
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Hide progress bars.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(base_url) = self.base_url {
            config.account.base_url = base_url;
        }

        if let Some(token) = self.token {
            config.account.access_token = token;
        }

        if let Some(courses) = self.courses {
            config.courses.ids = courses;
            config.courses.all = false;
        }

        if self.all {
            config.courses.all = true;
        }

        if let Some(dir) = self.download_directory {
            config.options.download_directory = dir;
        }

        if let Some(threads) = self.threads {
            config.options.max_threads = usize::from(threads);
        }

        if self.quiet {
            config.options.show_progress = false;
        }
    }
}
