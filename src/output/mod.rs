//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Progress bars
//! - Statistics reporting

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    course_label, print_banner, print_config_summary, print_course_list, print_error, print_info,
    print_warning,
};
pub use progress::{create_item_bar, create_spinner};
pub use stats::{format_bytes, print_course_stats, print_run_stats};
