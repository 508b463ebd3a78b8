//! Statistics reporting.

use console::style;

use crate::download::{CourseOutcome, RunStats};

/// Print the result of a single course.
pub fn print_course_stats(outcome: &CourseOutcome) {
    match outcome {
        CourseOutcome::Completed(stats) => {
            println!();
            println!(
                "{}",
                style(format!("Statistics for {}:", stats.course_name)).bold()
            );
            println!(
                "  Downloaded: {} ({})",
                stats.downloaded,
                format_bytes(stats.bytes)
            );
            println!("  Failed:     {}", stats.failed);
            println!("  Skipped:    {}", stats.skipped);
        }
        CourseOutcome::Skipped { course_name } => {
            println!(
                "{} {} (folder already exists)",
                style("Skipped").cyan(),
                course_name
            );
        }
        CourseOutcome::Failed { course_id, reason } => {
            println!("{} {}", style("Failed").red(), failure_line(*course_id, reason));
        }
    }
}

/// Print statistics across all courses.
pub fn print_run_stats(stats: &RunStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Global Statistics:").bold());
    println!("  Courses downloaded: {}", stats.courses_completed);
    println!("  Courses skipped:    {}", stats.courses_skipped);
    if stats.courses_failed > 0 {
        println!("  Courses failed:     {}", style(stats.courses_failed).red());
    }
    println!(
        "  Files:    {} downloaded ({})",
        style(stats.downloaded).green(),
        format_bytes(stats.bytes)
    );
    if stats.failed > 0 {
        println!("  Failed:   {}", style(stats.failed).red());
    }
    println!("  Skipped:  {}", style(stats.skipped).yellow());
    println!("{}", style("═".repeat(50)).dim());
}

fn failure_line(course_id: u64, reason: &str) -> String {
    format!("course {}: {}", course_id, reason)
}

/// Human readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
