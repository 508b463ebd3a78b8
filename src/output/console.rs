//! Console output utilities.

use console::style;

use crate::api::Course;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Canvas Downloader                                 ║
║     Bulk download course files from Canvas LMS        ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(
    base_url: &str,
    course_count: usize,
    threads: usize,
    download_dir: &str,
) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Canvas:    {}", base_url);
    println!("  Courses:   {}", course_count);
    println!("  Threads:   {}", threads);
    println!("  Directory: {}", download_dir);
    println!();
}

/// Print the courses available for selection.
pub fn print_course_list(courses: &[Course]) {
    println!();
    println!("{}", style("Available courses:").bold());
    for course in courses {
        println!("  {}", course_label(course));
    }
    println!();
}

/// Label shown for a course, `name (ID: id)`.
pub fn course_label(course: &Course) -> String {
    format!("{} (ID: {})", course.name, course.id)
}
