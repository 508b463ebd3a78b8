//! Canvas Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use canvas_downloader::{
    api::{CanvasApi, CourseSource},
    cli::Args,
    config::{validate_config, Config},
    download::{CourseDownloader, Dispatcher, RunStats},
    error::{exit_codes, Error, Result},
    fs::ensure_dir,
    output::{
        create_spinner, print_banner, print_config_summary, print_course_list,
        print_course_stats, print_error, print_info, print_run_stats, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    let result = tokio::select! {
        result = run() => result,
        _ = tokio::signal::ctrl_c() => {
            println!();
            print_info("Interrupted by user. Bye-bye!");
            return ExitCode::from(exit_codes::ABORT as u8);
        }
    };

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Api(_)
                | Error::Unauthorized(_)
                | Error::NotFound(_)
                | Error::RateLimited(_)
                | Error::Http(_)
                | Error::InvalidUrl(_)
                | Error::UrlParse(_) => ExitCode::from(exit_codes::API_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let list_only = args.list;
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    validate_config(&config)?;

    let api = CanvasApi::new(
        &config.account.base_url,
        config.account.access_token.clone(),
        config.request_timeout(),
        config.retry_policy(),
    )?;

    let needs_listing = list_only || config.courses.all || config.courses.ids.is_empty();
    let courses = if needs_listing {
        let spinner = create_spinner("Connecting to Canvas...");
        let courses = api.list_courses(&config.courses.enrollment_states).await;
        spinner.finish_and_clear();
        courses?
    } else {
        Vec::new()
    };

    if list_only {
        print_course_list(&courses);
        return Ok(());
    }

    let course_ids: Vec<u64> = if config.courses.all {
        courses.iter().map(|c| c.id).collect()
    } else {
        config.courses.ids.clone()
    };

    if course_ids.is_empty() {
        print_course_list(&courses);
        print_warning("No courses selected for download. Use --course <ID>... or --all. Bye!");
        return Ok(());
    }

    print_config_summary(
        api.base_url().as_str(),
        course_ids.len(),
        config.options.max_threads,
        &config.download_directory().display().to_string(),
    );

    ensure_dir(config.download_directory()).await?;

    let dispatcher = Dispatcher::new(
        api.http_client(),
        config.options.max_threads,
        config.retry_policy(),
    )
    .with_progress(config.options.show_progress);
    let downloader = CourseDownloader::new(&api, &dispatcher, &config);

    print_info(&format!(
        "Starting download of {} selected course(s) with {} threads",
        course_ids.len(),
        config.options.max_threads
    ));

    let mut run_stats = RunStats::default();
    for course_id in course_ids {
        let outcome = downloader.download_course(course_id).await;
        print_course_stats(&outcome);
        run_stats.add_outcome(&outcome);
    }

    print_run_stats(&run_stats);

    Ok(())
}
